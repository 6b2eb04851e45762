use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use libchinese_segmenter::{Config, Dictionary, Lexeme, LexemeType, Segmenter};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(about = "Segment Chinese text into words")]
struct Args {
    /// TOML configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    main_dict: Option<PathBuf>,

    #[arg(long)]
    quantifier_dict: Option<PathBuf>,

    #[arg(long = "ext-dict")]
    ext_dicts: Vec<PathBuf>,

    #[arg(long = "stop-words")]
    stop_words: Vec<PathBuf>,

    /// Emit every candidate instead of resolving ambiguity
    #[arg(long)]
    fine: bool,

    #[arg(long, value_enum, default_value_t = Format::Words)]
    format: Format,

    /// Input files; stdin when empty or "-"
    inputs: Vec<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Words separated by spaces, one line per input
    Words,
    /// One lexeme per line with positions and type
    Lexemes,
    /// One JSON object per lexeme
    Json,
}

#[derive(Serialize)]
struct Token<'a> {
    text: &'a str,
    begin: usize,
    end: usize,
    #[serde(rename = "type")]
    lexeme_type: LexemeType,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let dict = Dictionary::load(&config).context("loading dictionaries")?;
    info!(?dict, smart = config.use_smart, "dictionary ready");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.inputs.is_empty() {
        run(io::stdin().lock(), &dict, &config, args.format, &mut out)
            .context("segmenting stdin")?;
    }
    for input in &args.inputs {
        if input.as_os_str() == "-" {
            run(io::stdin().lock(), &dict, &config, args.format, &mut out)
                .context("segmenting stdin")?;
        } else {
            let file = File::open(input)
                .with_context(|| format!("opening {}", input.display()))?;
            run(BufReader::new(file), &dict, &config, args.format, &mut out)
                .with_context(|| format!("segmenting {}", input.display()))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };
    if args.main_dict.is_some() {
        config.main_dictionary = args.main_dict.clone();
    }
    if args.quantifier_dict.is_some() {
        config.quantifier_dictionary = args.quantifier_dict.clone();
    }
    config.ext_dictionaries.extend(args.ext_dicts.iter().cloned());
    config
        .ext_stop_word_dictionaries
        .extend(args.stop_words.iter().cloned());
    if args.fine {
        config.use_smart = false;
    }
    Ok(config)
}

fn run<R: Read, W: Write>(
    input: R,
    dict: &Arc<Dictionary>,
    config: &Config,
    format: Format,
    out: &mut W,
) -> Result<()> {
    let mut count = 0usize;
    let mut first = true;
    for lexeme in Segmenter::with_config(input, Arc::clone(dict), config) {
        let lexeme = lexeme?;
        write_lexeme(&lexeme, format, first, out)?;
        first = false;
        count += 1;
    }
    if matches!(format, Format::Words) {
        writeln!(out)?;
    }
    info!(count, "input segmented");
    Ok(())
}

fn write_lexeme<W: Write>(lexeme: &Lexeme, format: Format, first: bool, out: &mut W) -> Result<()> {
    match format {
        Format::Words => {
            if !first {
                write!(out, " ")?;
            }
            write!(out, "{}", lexeme.text())?;
        }
        Format::Lexemes => writeln!(out, "{lexeme}")?,
        Format::Json => {
            let token = Token {
                text: lexeme.text(),
                begin: lexeme.begin_position(),
                end: lexeme.end_position(),
                lexeme_type: lexeme.lexeme_type(),
            };
            serde_json::to_writer(&mut *out, &token)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
