#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

pub struct Image {
	pub width: usize,
	pub height: usize,
	pub data: Vec<u8>,
}

impl Image {
	pub fn fromWidthHeight(width: usize, height: usize) -> Image {
		Image { width, height, data: vec![0; width * height * 3] }
	}
}

pub mod gbr {
	use {super::Image, core::fmt};

	pub const TILE_SIZE: usize = 8;
	pub const BYTES_PER_TILE: usize = TILE_SIZE.pow(2);
	pub const TILES_PER_ROW: usize = 1;
	pub const EMPTY_TILE_THRESHOLD: usize = 3;
	pub const TILE_DATA_OFFSET: usize = 0xB4;

	// DMG greens, lightest to darkest
	pub const PALETTE: [[u8; 3]; 4] = [[155, 188, 15], [139, 172, 15], [48, 98, 48], [15, 56, 15]];

	#[derive(Debug, PartialEq, Eq)]
	pub enum Error {
		FileTooSmall,
		NoCompleteTiles,
		NoNonEmptyTiles,
	}

	impl fmt::Display for Error {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.write_str(match self {
				Error::FileTooSmall => "File too small (offset beyond file size)",
				Error::NoCompleteTiles => "No complete tiles found",
				Error::NoNonEmptyTiles => "No non-empty tiles found",
			})
		}
	}

	#[inline]
	pub fn tile(fileData: &[u8], index: usize) -> &[u8] {
		&fileData[TILE_DATA_OFFSET + index * BYTES_PER_TILE..][..BYTES_PER_TILE]
	}

	pub fn isTileEmpty(tile: &[u8]) -> bool {
		for &byte in tile {
			if byte != 0 {
				return false;
			}
		}
		true
	}

	#[derive(Debug)]
	pub struct TileScan {
		pub maxTiles: usize,
		pub numTiles: usize,
		pub stoppedAtTile: Option<usize>,
	}

	impl TileScan {
		/*
			The tile region runs from TILE_DATA_OFFSET to end of file as 64-byte
			records, one byte per pixel. Trailing empty (all-zero) tiles are
			padding; a run of EMPTY_TILE_THRESHOLD of them ends the image, and
			`stoppedAtTile` records where that run began.
		*/
		pub fn new(fileData: &[u8]) -> Result<TileScan, Error> {
			if fileData.len() < TILE_DATA_OFFSET {
				return Err(Error::FileTooSmall);
			}
			let maxTiles = (fileData.len() - TILE_DATA_OFFSET) / BYTES_PER_TILE;
			if maxTiles == 0 {
				return Err(Error::NoCompleteTiles);
			}
			let (mut numTiles, mut emptyCount, mut stoppedAtTile) = (0, 0, None);
			for i in 0..maxTiles {
				if isTileEmpty(tile(fileData, i)) {
					emptyCount += 1;
					if emptyCount >= EMPTY_TILE_THRESHOLD {
						stoppedAtTile = Some(i + 1 - EMPTY_TILE_THRESHOLD);
						break;
					}
				} else {
					emptyCount = 0;
					numTiles = i + 1;
				}
			}
			if numTiles == 0 {
				return Err(Error::NoNonEmptyTiles);
			}
			Ok(TileScan { maxTiles, numTiles, stoppedAtTile })
		}
	}

	impl Image {
		/*
			8x8 Tile :

			one byte per pixel, row-major: tile-local offset y*8 + x colors the
			image pixel (x0+x, y0+y). Byte values above 3 are not an error, they
			alias into the palette modulo 4.
		*/
		pub fn drawTile(&mut self, x0: usize, y0: usize, data: &[u8]) {
			for y in 0..TILE_SIZE {
				for x in 0..TILE_SIZE {
					let j = ((y0 + y) * self.width + x0 + x) * 3;
					self.data[j..j + 3].copy_from_slice(&PALETTE[data[y * TILE_SIZE + x] as usize % PALETTE.len()]);
				}
			}
		}
	}

	pub fn render(fileData: &[u8], numTiles: usize) -> Image {
		let numRows = (numTiles + TILES_PER_ROW - 1) / TILES_PER_ROW;
		let mut image = Image::fromWidthHeight(TILES_PER_ROW * TILE_SIZE, numRows * TILE_SIZE);
		for i in 0..numTiles {
			image.drawTile((i % TILES_PER_ROW) * TILE_SIZE, (i / TILES_PER_ROW) * TILE_SIZE, tile(fileData, i));
		}
		image
	}
}

pub mod ppm {
	use {
		super::Image,
		std::io::{self, Write},
	};

	// P6: text header, then raw row-major RGB triples, one byte per channel
	pub fn write(mut to: impl Write, image: &Image) -> io::Result<()> {
		write!(to, "P6\n{} {}\n255\n", image.width, image.height)?;
		to.write_all(&image.data)
	}
}

#[cfg(test)]
mod tests {
	use super::{
		gbr::{self, Error, TileScan, BYTES_PER_TILE, PALETTE, TILE_DATA_OFFSET},
		ppm,
	};

	const SOLID: [u8; BYTES_PER_TILE] = [1; BYTES_PER_TILE];
	const EMPTY: [u8; BYTES_PER_TILE] = [0; BYTES_PER_TILE];

	fn dump(tiles: &[[u8; BYTES_PER_TILE]]) -> Vec<u8> {
		let mut fileData = vec![0; TILE_DATA_OFFSET];
		for tile in tiles {
			fileData.extend_from_slice(tile);
		}
		fileData
	}

	#[test]
	fn scanCountsEveryTileWhenNoneAreEmpty() {
		let fileData = dump(&[SOLID; 5]);
		let scan = TileScan::new(&fileData).unwrap();
		assert_eq!((scan.maxTiles, scan.numTiles, scan.stoppedAtTile), (5, 5, None));
		let image = gbr::render(&fileData, scan.numTiles);
		assert_eq!((image.width, image.height), (8, 5 * 8));
	}

	#[test]
	fn scanStopsAtThresholdManyConsecutiveEmptyTiles() {
		let scan = TileScan::new(&dump(&[SOLID, EMPTY, EMPTY, EMPTY, SOLID])).unwrap();
		assert_eq!((scan.numTiles, scan.stoppedAtTile), (1, Some(1)));
	}

	#[test]
	fn shortEmptyRunsDoNotEndTheScan() {
		let scan = TileScan::new(&dump(&[SOLID, EMPTY, EMPTY, SOLID])).unwrap();
		assert_eq!((scan.numTiles, scan.stoppedAtTile), (4, None));
	}

	#[test]
	fn trailingEmptiesBelowThresholdAreExcluded() {
		let scan = TileScan::new(&dump(&[SOLID, EMPTY, EMPTY])).unwrap();
		assert_eq!((scan.numTiles, scan.stoppedAtTile), (1, None));
	}

	#[test]
	fn entirelyEmptyTileRegionIsFatal() {
		assert_eq!(TileScan::new(&dump(&[EMPTY; 4])).unwrap_err(), Error::NoNonEmptyTiles);
	}

	#[test]
	fn fileShorterThanTileDataOffsetIsFatal() {
		assert_eq!(TileScan::new(&vec![0; TILE_DATA_OFFSET - 1]).unwrap_err(), Error::FileTooSmall);
	}

	#[test]
	fn regionWithoutOneWholeTileIsFatal() {
		assert_eq!(TileScan::new(&vec![0; TILE_DATA_OFFSET]).unwrap_err(), Error::NoCompleteTiles);
		assert_eq!(
			TileScan::new(&vec![0; TILE_DATA_OFFSET + BYTES_PER_TILE - 1]).unwrap_err(),
			Error::NoCompleteTiles
		);
	}

	#[test]
	fn pixelBytesAliasIntoThePaletteModulo4() {
		let mut tile = [0_u8; BYTES_PER_TILE];
		for (i, byte) in tile.iter_mut().enumerate() {
			*byte = (i % 4) as u8;
		}
		tile[60] = 7; // 60 % 4 == 0, so aliasing is observable here
		let image = gbr::render(&dump(&[tile]), 1);
		for (i, rgb) in image.data.chunks_exact(3).enumerate() {
			assert_eq!(rgb, PALETTE[if i == 60 { 3 } else { i % 4 }], "pixel {i}");
		}
	}

	#[test]
	fn ppmContainerForOneTile() {
		let output = &mut Vec::new();
		ppm::write(&mut *output, &gbr::render(&dump(&[SOLID]), 1)).unwrap();
		const HEADER: &[u8] = b"P6\n8 8\n255\n";
		assert_eq!(&output[..HEADER.len()], HEADER);
		let body = &output[HEADER.len()..];
		assert_eq!(body.len(), 8 * 8 * 3);
		for rgb in body.chunks_exact(3) {
			assert_eq!(rgb, PALETTE[1]);
		}
	}
}
