use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use rayon::prelude::*;

use glyph_tensors::{
    glyph_profile, BatchOptions, DescriptionCatalog, Error, FontFile, FontTensorAssembler,
    GlyphBatcher, PlaceholderStyle, ProcessedFont,
};

#[derive(clap::Parser, Debug)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Convert each font into a JSON record of glyph, axis and style tensors
    Tensors {
        /// JSON file with human authored font descriptions
        #[arg(long)]
        descriptions: Option<PathBuf>,
        /// Directory to write one `<font>.json` per font into; records go to
        /// stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        /// Process glyphs of a font on the current thread only
        #[arg(long)]
        sequential: bool,
        /// Seed for the placeholder style vector
        #[arg(long)]
        seed: Option<u64>,
        /// Face index within font collections
        #[arg(long, default_value_t = 0)]
        index: u32,
        /// Print the path for each font file as it is processed
        #[arg(long)]
        print_paths: bool,
        /// Paths to font files (may use glob syntax)
        files: Vec<PathBuf>,
    },
    /// Print metadata, description, axes and named instances of a font
    Inspect {
        #[arg(long)]
        descriptions: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        index: u32,
        file: PathBuf,
    },
    /// Print the typed points of one glyph
    Glyph {
        #[arg(long, default_value_t = 0)]
        index: u32,
        file: PathBuf,
        /// Glyph name, as found in the `post` table
        name: String,
    },
}

fn main() {
    env_logger::init();
    use clap::Parser as _;
    let args = Args::parse_from(wild::args());

    let result = match args.command {
        Command::Tensors {
            descriptions,
            out,
            sequential,
            seed,
            index,
            print_paths,
            files,
        } => tensors(
            descriptions.as_deref(),
            out.as_deref(),
            !sequential,
            seed,
            index,
            print_paths,
            &files,
        ),
        Command::Inspect {
            descriptions,
            index,
            file,
        } => inspect(descriptions.as_deref(), index, &file),
        Command::Glyph { index, file, name } => glyph(index, &file, &name),
    };
    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}

fn load_descriptions(path: Option<&Path>) -> Result<DescriptionCatalog, Error> {
    path.map(DescriptionCatalog::load)
        .transpose()
        .map(Option::unwrap_or_default)
}

fn tensors(
    descriptions: Option<&Path>,
    out: Option<&Path>,
    parallel: bool,
    seed: Option<u64>,
    index: u32,
    print_paths: bool,
    files: &[PathBuf],
) -> Result<bool, Error> {
    let style = seed.map(PlaceholderStyle::seeded).unwrap_or_default();
    let assembler = FontTensorAssembler::new(
        GlyphBatcher::new(BatchOptions { parallel }),
        style,
        load_descriptions(descriptions)?,
    );
    if let Some(out) = out {
        std::fs::create_dir_all(out).map_err(|source| Error::Io {
            path: out.to_owned(),
            source,
        })?;
    }
    let ok = AtomicBool::new(true);
    files.par_iter().for_each(|path| {
        if print_paths {
            // stdout carries the records when no output directory is given
            eprintln!("[{path:?}]");
        }
        let written = assembler
            .process_path(path, index)
            .and_then(|processed| write_record(&processed, out));
        if let Err(e) = written {
            log::error!("{e}");
            ok.store(false, Ordering::Release);
        }
    });
    Ok(ok.load(Ordering::Acquire))
}

fn write_record(processed: &ProcessedFont, out: Option<&Path>) -> Result<(), Error> {
    let io_error = |path: &Path, source: std::io::Error| Error::Io {
        path: path.to_owned(),
        source,
    };
    match out {
        Some(dir) => {
            let stem = processed
                .path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let target = dir.join(format!("{stem}.json"));
            let file = std::fs::File::create(&target).map_err(|e| io_error(&target, e))?;
            let mut writer = std::io::BufWriter::new(file);
            serde_json::to_writer(&mut writer, processed).map_err(|source| {
                if source.is_io() {
                    io_error(&target, source.into())
                } else {
                    Error::Output {
                        path: target.clone(),
                        source,
                    }
                }
            })?;
            writer.flush().map_err(|e| io_error(&target, e))
        }
        None => {
            let line = serde_json::to_string(processed).map_err(|source| Error::Output {
                path: processed.path.clone(),
                source,
            })?;
            writeln!(std::io::stdout().lock(), "{line}").map_err(|e| io_error(&processed.path, e))
        }
    }
}

fn inspect(descriptions: Option<&Path>, index: u32, path: &Path) -> Result<bool, Error> {
    let catalog = load_descriptions(descriptions)?;
    let file = FontFile::open(path)?;
    let table = file.table(index)?;
    let faces = file.face_count()?;
    let summary = serde_json::json!({
        "path": file.path(),
        "faces": faces,
        "metadata": table.metadata(),
        "description": catalog.lookup(&file.file_name()),
        "axes": table.axes(),
        "instances": table.named_instances(),
        "glyph_count": glyph_tensors::OutlineSource::glyph_count(&table),
    });
    print_json(file.path(), &summary)?;
    Ok(true)
}

fn glyph(index: u32, path: &Path, name: &str) -> Result<bool, Error> {
    let file = FontFile::open(path)?;
    let table = file.table(index)?;
    match glyph_profile(&table, name) {
        Ok(Some(profile)) => {
            print_json(file.path(), &profile)?;
            Ok(true)
        }
        Ok(None) => {
            log::error!("no glyph named '{name}' in {path:?}");
            Ok(false)
        }
        Err(e) => {
            log::error!("{e}");
            Ok(false)
        }
    }
}

fn print_json(path: &Path, value: &impl serde::Serialize) -> Result<(), Error> {
    let text = serde_json::to_string_pretty(value).map_err(|source| Error::Output {
        path: path.to_owned(),
        source,
    })?;
    writeln!(std::io::stdout(), "{text}").map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })
}
