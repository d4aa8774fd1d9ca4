//! Ferramenta de linha de comando: lê texto em blocos de parágrafo (stdin ou
//! arquivo), reconhece entidades e escreve a marcação XML aninhada (stdout
//! ou arquivo). Diagnósticos vão para stderr; a saída contém apenas a
//! marcação. Sai com status 1 em erro de configuração ou de E/S.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use entag_core::{CrossingPolicy, NerModel, NerPipeline, TokenizerMode};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Texto corrido, tokenizado pelo próprio pipeline.
    Untokenized,
    /// Um token por linha; linha em branco separa sentenças.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CrossingArg {
    /// Falha ao encontrar um span estruturalmente inválido (padrão).
    Reject,
    /// Descarta o span conflitante e continua.
    Drop,
}

#[derive(Parser)]
#[command(
    name = "entag",
    version,
    about = "Reconhece entidades nomeadas e as emite como marcação XML aninhada"
)]
struct Args {
    /// Caminho do modelo (JSON). Sem este argumento, usa o modelo embutido.
    model: Option<PathBuf>,

    /// Formato da entrada.
    #[arg(long, value_enum, default_value = "untokenized")]
    input: InputFormat,

    /// Política para spans cruzados ou inválidos vindos do reconhecedor.
    #[arg(long, value_enum, default_value = "reject")]
    crossing: CrossingArg,

    /// Arquivo de entrada (stdin se omitido).
    #[arg(short = 'i', long = "in")]
    in_file: Option<PathBuf>,

    /// Arquivo de saída (stdout se omitido).
    #[arg(short = 'o', long = "out")]
    out_file: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let model = match &args.model {
        Some(path) => {
            info!("Carregando modelo de {}", path.display());
            match NerModel::load(path) {
                Ok(model) => model,
                Err(err) => {
                    error!("{err}");
                    process::exit(1);
                }
            }
        }
        None => NerModel::builtin(),
    };

    let mut pipeline = match NerPipeline::new(model) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };
    if args.input == InputFormat::Vertical {
        pipeline.set_tokenizer_mode(TokenizerMode::Vertical);
    }
    pipeline.set_crossing_policy(match args.crossing {
        CrossingArg::Reject => CrossingPolicy::Reject,
        CrossingArg::Drop => CrossingPolicy::Drop,
    });

    let start = Instant::now();
    if let Err(err) = run(&pipeline, &args) {
        error!("{err}");
        process::exit(1);
    }
    info!(
        "Reconhecimento concluído em {:.3}s",
        start.elapsed().as_secs_f64()
    );
}

fn run(pipeline: &NerPipeline, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let reader: Box<dyn BufRead> = match &args.in_file {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn Write> = match &args.out_file {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    pipeline.run(reader, writer)?;
    Ok(())
}
