/*!
Generate a synthetic corpus, window it, and stream batches through the naive baselines
*/

use anyhow::format_err;
use clap::{App, Arg, ArgMatches};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use wavecast::{
    baseline::{evaluate, LinearTrend, LossSummary, Persistence, Predictor, WindowMean},
    data::write_sequence,
    wave::WaveformKind,
    Config,
};

const DEFAULT_STEPS: u64 = 1000;

fn parse_or<T>(matches: &ArgMatches, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match matches.value_of(name) {
        Some(value) => value
            .parse()
            .map_err(|err| format_err!("Invalid value {:?} for --{}: {}", value, name, err)),
        None => Ok(default),
    }
}

fn config_from(matches: &ArgMatches) -> anyhow::Result<Config> {
    let defaults = Config::default();
    let kinds = match matches.value_of("kinds") {
        Some(kinds) => kinds
            .split(',')
            .map(|kind| kind.trim().parse::<WaveformKind>())
            .collect::<Result<Vec<_>, _>>()?,
        None => defaults.kinds.clone(),
    };
    Ok(Config {
        kinds,
        seq_len: parse_or(matches, "seq-len", defaults.seq_len)?,
        window_len: parse_or(matches, "window", defaults.window_len)?,
        batch_size: parse_or(matches, "batch", defaults.batch_size)?,
        eval_windows: parse_or(matches, "eval", defaults.eval_windows)?,
        shuffle_buffer: parse_or(matches, "buffer", defaults.shuffle_buffer)?,
        n_predict: parse_or(matches, "predict", defaults.n_predict)?,
        seed: parse_or(matches, "seed", defaults.seed)?,
        ..defaults
    })
}

pub fn run(verbosity: usize, config: &Config, steps: u64, dump: Option<&str>) -> anyhow::Result<()> {
    if verbosity >= 2 {
        eprintln!("Configuration: {:#?}", config);
    }

    let dataset = config.prepare()?;

    if let Some(path) = dump {
        let file = File::create(Path::new(path))?;
        let written = write_sequence(file, dataset.sequence.iter().copied())?;
        if verbosity >= 1 {
            eprintln!("Wrote {} samples to {}", written, path);
        }
    }

    // === EVALUATION ===

    let predictors: &[(&str, &dyn Predictor)] = &[
        ("persistence", &Persistence),
        ("window mean", &WindowMean),
        ("linear trend", &LinearTrend),
    ];
    for eval_batch in dataset.eval_batches() {
        let (rows, cols) = eval_batch.shape();
        println!("Evaluation batch: {} windows of {} samples", rows, cols);
        for (name, predictor) in predictors {
            let loss = evaluate(*predictor, &eval_batch, config.n_predict)?;
            println!("{:>12}: evaluation RMSE = {:.5}", name, loss);
        }
    }

    // === TRAINING STREAM ===

    let progress = ProgressBar::new(steps);
    progress.set_style(
        ProgressStyle::default_bar().template("[{msg:<15}] {wide_bar} {pos:> 7}/{len:7}"),
    );
    progress.set_message("no loss");

    let mut summary = LossSummary::default();

    for batch in dataset.train_batches(config)?.take(steps as usize) {
        let loss = evaluate(&Persistence, &batch, config.n_predict)?;
        summary.push(loss);
        progress.inc(1);
        progress.set_message(&format!("loss = {:.5}", loss));
    }
    progress.finish_and_clear();

    println!("Persistence over the training stream: {}", summary);

    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    let matches = App::new("Wavecast Playground")
        .version("1.0")
        .about("Generates a synthetic waveform corpus and streams training batches through naive baselines")
        .arg(
            Arg::with_name("kinds")
                .short("k")
                .long("kinds")
                .help("Comma separated waveforms: sine, sine-var-freq, sine-var-amp-noise, mixed")
                .takes_value(true),
        )
        .arg(Arg::with_name("seq-len").long("seq-len").help("Samples per waveform").takes_value(true))
        .arg(Arg::with_name("window").short("l").long("window").help("Window length").takes_value(true))
        .arg(Arg::with_name("batch").short("b").long("batch").help("Training batch size").takes_value(true))
        .arg(Arg::with_name("eval").short("e").long("eval").help("Evaluation windows").takes_value(true))
        .arg(Arg::with_name("buffer").long("buffer").help("Shuffle buffer capacity").takes_value(true))
        .arg(Arg::with_name("predict").short("p").long("predict").help("Samples predicted per window").takes_value(true))
        .arg(Arg::with_name("seed").short("s").long("seed").help("Random seed").takes_value(true))
        .arg(Arg::with_name("steps").long("steps").help("Training batches to stream").takes_value(true))
        .arg(
            Arg::with_name("dump")
                .short("o")
                .long("dump")
                .help("Write the generated sequence to a CSV file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Sets the level of verbosity")
                .takes_value(true),
        )
        .get_matches();

    let verbosity = matches
        .value_of("verbose")
        .map(|v| usize::from_str_radix(v, 10))
        .unwrap_or(Ok(0))?;
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let config = config_from(&matches)?;
    let steps = parse_or(&matches, "steps", DEFAULT_STEPS)?;
    run(verbosity, &config, steps, matches.value_of("dump"))
}
