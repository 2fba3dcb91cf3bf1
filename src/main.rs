#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	const_format::formatcp,
	core::fmt,
	gbr_into_ppm::{gbr, ppm},
	std::{
		fs::File,
		io::{BufWriter, Read, Write},
		process,
	},
};

const OUTPUT_FILE: &str = "output.png";

fn fatal(message: fmt::Arguments<'_>) -> ! {
	eprintln!("Error: {message}");
	process::exit(1)
}

fn main() {
	#[derive(Parser)]
	struct Args {
		inputFile: String,
	}
	let Args { inputFile } = Args::try_parse().unwrap_or_else(|_| {
		println!("Usage: gbr_into_ppm <input_file>");
		println!("Extracts Gameboy tiles from a .GBR file and saves them as a raw P6 pixmap");
		println!("{}", formatcp!(
			"Automatically stops when {} consecutive empty tiles are found",
			gbr::EMPTY_TILE_THRESHOLD
		));
		process::exit(1);
	});

	let fileData = &mut Vec::new();
	{
		let path = inputFile.as_str();
		let mut file =
			File::open(path).unwrap_or_else(|err| fatal(format_args!("Cannot open input file {path}: {err}")));
		file.read_to_end(fileData)
			.unwrap_or_else(|err| fatal(format_args!("Cannot read input file {path}: {err}")));
	}
	let fileData: &_ = fileData;
	println!("File size: {} bytes", fileData.len());
	println!("Tile data offset: {:#X}", gbr::TILE_DATA_OFFSET);

	let scan = gbr::TileScan::new(fileData).unwrap_or_else(|err| fatal(format_args!("{err}")));
	println!("Maximum possible tiles: {}", scan.maxTiles);
	if let Some(tileIndex) = scan.stoppedAtTile {
		println!(
			"Found {} consecutive empty tiles at tile {tileIndex}, stopping here",
			gbr::EMPTY_TILE_THRESHOLD
		);
	}
	println!("Actual number of tiles (excluding trailing empty): {}", scan.numTiles);

	let image = gbr::render(fileData, scan.numTiles);
	{
		let mut output = BufWriter::new(File::create(OUTPUT_FILE).unwrap_or_else(|err| {
			fatal(format_args!("Cannot create output file {OUTPUT_FILE}: {err}"))
		}));
		ppm::write(&mut output, &image)
			.and_then(|()| output.flush())
			.unwrap_or_else(|err| fatal(format_args!("Cannot write output file {OUTPUT_FILE}: {err}")));
	}
	println!("Saved image to {OUTPUT_FILE} ({}x{})", image.width, image.height);
}
