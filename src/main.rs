use clap::{Arg, ArgAction, ArgMatches, Command};
use markup_translator::config::load_credential_from_env;
use markup_translator::{
    MarkupError, MarkupResult, MarkupTranslator, MockGateway, MockMode, TranslatorOptions,
    list_supported_languages,
};
use std::path::Path;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("markup-translator")
        .version("0.1.0")
        .about("Translate HTML-like markup while keeping templating syntax intact")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("text")
                .about("Translate a string and print the result")
                .arg(
                    Arg::new("text")
                        .help("Markup to translate")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("target")
                        .help("Target language code (e.g., es, fr, zh-CN)")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("file")
                .about("Translate a file and write the result to another file")
                .arg(Arg::new("input").help("Input file").required(true).index(1))
                .arg(Arg::new("output").help("Output file").required(true).index(2))
                .arg(
                    Arg::new("target")
                        .help("Target language code (e.g., es, fr, zh-CN)")
                        .required(true)
                        .index(3),
                ),
        )
        .subcommand(Command::new("languages").about("List supported target languages"))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("JSON options file (excludeDelimiters, includeAttributes, restrictLanguages)"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .short('k')
                .global(true)
                .help("Google Translate API key (default: $GOOGLE_TRANSLATE_API_KEY)"),
        )
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .short('d')
                .global(true)
                .num_args(2)
                .value_names(["START", "END"])
                .action(ArgAction::Append)
                .help("Protect spans between START and END (repeatable)"),
        )
        .arg(
            Arg::new("attribute")
                .long("attribute")
                .short('a')
                .global(true)
                .action(ArgAction::Append)
                .help("Translate values of this attribute separately (repeatable)"),
        )
        .arg(
            Arg::new("any-language")
                .long("any-language")
                .global(true)
                .help("Send any target language code to the provider")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .global(true)
                .help("Use mock translator instead of Google Translate")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Show detailed translation process")
                .action(ArgAction::SetTrue),
        )
}

/// Options file first, then command-line additions on top
fn build_options(matches: &ArgMatches) -> MarkupResult<TranslatorOptions> {
    let mut options = match matches.get_one::<String>("config") {
        Some(path) => TranslatorOptions::from_json_file(Path::new(path))?,
        None => TranslatorOptions::default(),
    };

    if let Some(pairs) = matches.get_occurrences::<String>("delimiter") {
        for mut pair in pairs {
            if let (Some(start), Some(end)) = (pair.next(), pair.next()) {
                options = options.with_delimiter(start, end);
            }
        }
    }

    if let Some(names) = matches.get_many::<String>("attribute") {
        for name in names {
            options = options.with_attribute(name);
        }
    }

    if matches.get_flag("any-language") {
        options = options.restrict_languages(false);
    }

    Ok(options)
}

fn build_translator(matches: &ArgMatches) -> MarkupResult<MarkupTranslator> {
    let options = build_options(matches)?;

    if matches.get_flag("mock") {
        return MarkupTranslator::with_gateway(
            "mock-credential",
            options,
            Arc::new(MockGateway::new(MockMode::Suffix)),
        );
    }

    let credential = match matches.get_one::<String>("key") {
        Some(key) => key.clone(),
        None => load_credential_from_env()?,
    };
    MarkupTranslator::new(credential, options)
}

/// Subcommand argument declared `required`
fn required<'a>(matches: &'a ArgMatches, id: &str) -> MarkupResult<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| MarkupError::Validation(format!("Missing argument: {}", id)))
}

async fn run(matches: ArgMatches) -> MarkupResult<()> {
    match matches.subcommand() {
        Some(("text", sub)) => {
            let translator = build_translator(sub)?;
            let result = translator
                .translate_from_text(required(sub, "text")?, required(sub, "target")?)
                .await?;
            println!("{}", result);
        }
        Some(("file", sub)) => {
            let translator = build_translator(sub)?;
            let input = required(sub, "input")?;
            let output = required(sub, "output")?;
            translator
                .translate_from_file(input, output, required(sub, "target")?)
                .await?;
            println!("✅ {} → {}", input, output);
        }
        Some(("languages", _)) => {
            for (name, code) in list_supported_languages() {
                println!("{:<8} {}", code, name);
            }
        }
        _ => unreachable!("subcommand_required is set"),
    }

    Ok(())
}

/// `RUST_LOG` when set, otherwise `info` (`debug` with `--verbose`)
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let verbose = matches
        .subcommand()
        .is_some_and(|(_, sub)| sub.get_flag("verbose"));
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .init();

    if let Err(e) = run(matches).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
