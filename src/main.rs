use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use wadm::config::Config;
use wadm::matrix::{ScoreModel, DEFAULT_WEIGHT};
use wadm::{output, scoring, table};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new decision table with the default criteria
    Init {
        /// Overwrite an existing table
        #[arg(long)]
        force: bool,
    },
    /// Print the decision table
    Show,
    /// Add, remove or reweight criteria
    Criterion {
        #[command(subcommand)]
        action: CriterionAction,
    },
    /// Add or remove alternatives
    Alternative {
        #[command(subcommand)]
        action: AlternativeAction,
    },
    /// Set one alternative's score for one criterion
    Set {
        alternative: String,
        criterion: String,
        #[arg(allow_hyphen_values = true, value_parser = parse_finite)]
        score: f64,
    },
    /// Replace the current table with the contents of another CSV file
    Import {
        /// Table to load
        source: PathBuf,
    },
    /// Show the weighted total of every alternative
    Scores {
        /// Sort best first instead of table order
        #[arg(long)]
        sort: bool,
        /// Print JSON
        #[arg(long, conflicts_with = "tsv")]
        json: bool,
        /// Print tab-separated name/score pairs
        #[arg(long)]
        tsv: bool,
    },
    /// List every combination of alternatives that fits the budget
    Combos {
        /// Total budget (defaults to the configured budget)
        #[arg(short, long, allow_hyphen_values = true, value_parser = parse_budget)]
        budget: Option<f64>,
        /// Price of an alternative as NAME=PRICE (repeatable)
        #[arg(short, long = "price", value_parser = parse_price)]
        prices: Vec<(String, f64)>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CriterionAction {
    /// Append a criterion; every alternative scores 0 on it
    Add {
        name: String,
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_WEIGHT,
            allow_hyphen_values = true,
            value_parser = parse_finite
        )]
        weight: f64,
    },
    /// Remove the first criterion with this name and its scores
    Remove { name: String },
    /// Change a criterion's weight
    Weight {
        name: String,
        #[arg(allow_hyphen_values = true, value_parser = parse_finite)]
        weight: f64,
    },
}

#[derive(Subcommand, Debug)]
enum AlternativeAction {
    /// Add an alternative, optionally with its scores in criterion order
    Add {
        name: String,
        #[arg(
            short,
            long,
            value_delimiter = ',',
            allow_hyphen_values = true,
            value_parser = parse_finite
        )]
        scores: Option<Vec<f64>>,
    },
    /// Remove an alternative
    Remove { name: String },
}

#[derive(Parser, Debug)]
#[command(name = "wadm")]
#[command(about = "Weighted average decision matrix", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/wadm/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Decision table to operate on (defaults to matrix_path from config, then ./wadm_data.csv)
    #[arg(short, long, global = true)]
    file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match wadm::config::load_config(cli.config.clone().map(PathBuf::from)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = wadm::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let path = cli
        .file
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.matrix_path());

    if let Err(e) = run(cli.command, &config, &path) {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_FAILURE);
    }

    std::process::exit(EXIT_SUCCESS);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands, config: &Config, path: &Path) -> Result<()> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists. Use --force to overwrite it.",
                    path.display()
                );
            }
            let model = ScoreModel::with_default_criteria(config.default_criteria.iter().cloned());
            table::save_model(path, &model)?;
            println!(
                "Created {} with {} criteria.",
                path.display(),
                model.criterion_count()
            );
        }
        Commands::Show => {
            let model = table::load_model(path)?;
            println!("{}", output::format_matrix(&model, use_colors));
        }
        Commands::Criterion { action } => {
            let mut model = table::load_model(path)?;
            let message = match action {
                CriterionAction::Add { name, weight } => {
                    model.add_criterion(name.clone(), weight);
                    format!("Added criterion '{}'.", name)
                }
                CriterionAction::Remove { name } => {
                    model.remove_criterion(&name)?;
                    format!("Removed criterion '{}'.", name)
                }
                CriterionAction::Weight { name, weight } => {
                    model.set_weight(&name, weight)?;
                    format!(
                        "Set weight of '{}' to {}.",
                        name,
                        output::format_number(weight)
                    )
                }
            };
            table::save_model(path, &model)?;
            println!("{}", message);
        }
        Commands::Alternative { action } => {
            let mut model = table::load_model(path)?;
            let message = match action {
                AlternativeAction::Add { name, scores } => {
                    model.add_alternative(name.clone(), scores)?;
                    format!("Added alternative '{}'.", name)
                }
                AlternativeAction::Remove { name } => {
                    model.remove_alternative(&name)?;
                    format!("Removed alternative '{}'.", name)
                }
            };
            table::save_model(path, &model)?;
            println!("{}", message);
        }
        Commands::Set {
            alternative,
            criterion,
            score,
        } => {
            let mut model = table::load_model(path)?;
            model.set_score(&alternative, &criterion, score)?;
            table::save_model(path, &model)?;
            println!(
                "Set '{}' / '{}' to {}.",
                alternative,
                criterion,
                output::format_number(score)
            );
        }
        Commands::Import { source } => {
            let model = table::load_model(&source)?;
            table::save_model(path, &model)?;
            println!(
                "Loaded {} criteria and {} alternatives from {}.",
                model.criterion_count(),
                model.alternative_count(),
                source.display()
            );
        }
        Commands::Scores { sort, json, tsv } => {
            let model = table::load_model(path)?;
            let mut scores = scoring::weighted_scores(&model);
            if sort {
                scores = scoring::rank(scores);
            }

            if json {
                let out = serde_json::to_string_pretty(&scores)
                    .context("Failed to serialize scores")?;
                println!("{}", out);
            } else if tsv {
                println!("{}", output::format_tsv(&scores));
            } else {
                println!("{}", output::format_scores_table(&scores, use_colors));
            }
        }
        Commands::Combos {
            budget,
            prices,
            json,
        } => {
            let model = table::load_model(path)?;
            let budget = budget.unwrap_or_else(|| config.budget());
            let prices = resolve_prices(&model, config, prices);

            let start = Instant::now();
            let combos = scoring::feasible_combinations_capped(
                &model,
                &prices,
                budget,
                config.max_alternatives(),
            )?;
            tracing::debug!(
                found = combos.len(),
                alternatives = model.alternative_count(),
                elapsed = ?start.elapsed(),
                "enumerated combinations"
            );

            if json {
                let out = serde_json::to_string_pretty(&combos)
                    .context("Failed to serialize combinations")?;
                println!("{}", out);
            } else {
                println!("{}", output::format_combinations(&combos, budget, use_colors));
            }
        }
    }

    Ok(())
}

/// Parse a finite number; `nan` and `inf` are refused
fn parse_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{}'", s))?;
    if !value.is_finite() {
        return Err(format!("number must be finite, got '{}'", s));
    }
    Ok(value)
}

/// Parse a finite, non-negative amount of money
fn parse_amount(s: &str, what: &str) -> Result<f64, String> {
    let value = parse_finite(s).map_err(|_| format!("invalid {} '{}'", what, s))?;
    if value < 0.0 {
        return Err(format!("{} must be non-negative, got '{}'", what, s));
    }
    Ok(value)
}

fn parse_budget(s: &str) -> Result<f64, String> {
    parse_amount(s, "budget")
}

/// Parse a `NAME=PRICE` command-line value
fn parse_price(s: &str) -> Result<(String, f64), String> {
    let (name, price) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=PRICE, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("missing alternative name in '{}'", s));
    }
    let price = parse_amount(price, "price")?;
    Ok((name.to_string(), price))
}

/// Merge configured prices with command-line overrides.
///
/// Alternatives that still have no price fall back to `default_price` when
/// one is configured; otherwise they stay unpriced and the search reports it.
fn resolve_prices(
    model: &ScoreModel,
    config: &Config,
    overrides: Vec<(String, f64)>,
) -> HashMap<String, f64> {
    let mut prices = config.prices.clone();
    prices.extend(overrides);

    if let Some(default_price) = config.default_price {
        for name in model.alternative_names() {
            if !prices.contains_key(name) {
                tracing::warn!(
                    alternative = name,
                    price = default_price,
                    "no price given, using default_price"
                );
                prices.insert(name.to_string(), default_price);
            }
        }
    }

    prices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(names: &[&str]) -> ScoreModel {
        let mut model = ScoreModel::with_default_criteria(["Budget"]);
        for name in names {
            model.add_alternative(*name, None).unwrap();
        }
        model
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("Civic=24000").unwrap(), ("Civic".to_string(), 24000.0));
        assert_eq!(parse_price("a=b=1.5").unwrap(), ("a=b".to_string(), 1.5));
    }

    #[test]
    fn test_parse_price_rejects_bad_input() {
        assert!(parse_price("Civic").is_err());
        assert!(parse_price("=100").is_err());
        assert!(parse_price("Civic=cheap").is_err());
        assert!(parse_price("Civic=-5").is_err());
    }

    #[test]
    fn test_resolve_prices_overrides_config() {
        let model = model_with(&["X", "Y"]);
        let mut config = Config::default();
        config.prices.insert("X".to_string(), 100.0);
        config.prices.insert("Y".to_string(), 200.0);

        let prices = resolve_prices(&model, &config, vec![("Y".to_string(), 50.0)]);
        assert_eq!(prices["X"], 100.0);
        assert_eq!(prices["Y"], 50.0);
    }

    #[test]
    fn test_resolve_prices_uses_default_price() {
        let model = model_with(&["X", "Y"]);
        let mut config = Config::default();
        config.default_price = Some(500.0);

        let prices = resolve_prices(&model, &config, vec![("X".to_string(), 10.0)]);
        assert_eq!(prices["X"], 10.0);
        assert_eq!(prices["Y"], 500.0);
    }

    #[test]
    fn test_resolve_prices_leaves_gaps_without_default() {
        let model = model_with(&["X"]);
        let prices = resolve_prices(&model, &Config::default(), vec![]);
        assert!(prices.is_empty());
    }

    #[test]
    fn test_cli_parses_negative_weight() {
        let cli = Cli::try_parse_from(["wadm", "criterion", "add", "Price", "--weight", "-2"])
            .unwrap();
        match cli.command {
            Commands::Criterion {
                action: CriterionAction::Add { name, weight },
            } => {
                assert_eq!(name, "Price");
                assert_eq!(weight, -2.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite("-2.5").unwrap(), -2.5);
        assert!(parse_finite("nan").is_err());
        assert!(parse_finite("inf").is_err());
        assert!(parse_finite("-infinity").is_err());
        assert!(parse_finite("lots").is_err());
    }

    #[test]
    fn test_parse_budget() {
        assert_eq!(parse_budget("250").unwrap(), 250.0);
        assert_eq!(parse_budget("0").unwrap(), 0.0);
        assert!(parse_budget("nan").is_err());
        assert!(parse_budget("inf").is_err());
        let err = parse_budget("-5").unwrap_err();
        assert_eq!(err, "budget must be non-negative, got '-5'");
    }

    #[test]
    fn test_cli_rejects_non_finite_numbers() {
        assert!(Cli::try_parse_from(["wadm", "set", "Civic", "油耗", "nan"]).is_err());
        assert!(Cli::try_parse_from(["wadm", "criterion", "add", "Price", "--weight", "inf"]).is_err());
        assert!(Cli::try_parse_from(["wadm", "criterion", "weight", "Price", "NaN"]).is_err());
        assert!(
            Cli::try_parse_from(["wadm", "alternative", "add", "Civic", "--scores", "1,nan,3"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["wadm", "combos", "--budget", "nan"]).is_err());
    }

    #[test]
    fn test_cli_negative_budget_reports_validation_error() {
        let err = Cli::try_parse_from(["wadm", "combos", "-b", "-5"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("budget must be non-negative"));
    }

    #[test]
    fn test_cli_parses_negative_score() {
        let cli = Cli::try_parse_from(["wadm", "set", "Civic", "油耗", "-1.5"]).unwrap();
        match cli.command {
            Commands::Set { score, .. } => assert_eq!(score, -1.5),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_scores_list() {
        let cli = Cli::try_parse_from(["wadm", "alternative", "add", "Civic", "--scores", "1,2.5,3"])
            .unwrap();
        match cli.command {
            Commands::Alternative {
                action: AlternativeAction::Add { scores, .. },
            } => assert_eq!(scores, Some(vec![1.0, 2.5, 3.0])),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_repeated_prices() {
        let cli = Cli::try_parse_from([
            "wadm", "combos", "--budget", "250", "-p", "X=100", "-p", "Y=200",
        ])
        .unwrap();
        match cli.command {
            Commands::Combos { budget, prices, .. } => {
                assert_eq!(budget, Some(250.0));
                assert_eq!(prices.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_run_edits_table_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.csv");
        let mut config = Config::default();
        config.default_criteria = vec!["Budget".to_string(), "Comfort".to_string()];

        run(Commands::Init { force: false }, &config, &path).unwrap();
        assert!(run(Commands::Init { force: false }, &config, &path).is_err());

        run(
            Commands::Alternative {
                action: AlternativeAction::Add {
                    name: "Civic".to_string(),
                    scores: Some(vec![3.0, 4.0]),
                },
            },
            &config,
            &path,
        )
        .unwrap();
        run(
            Commands::Criterion {
                action: CriterionAction::Remove {
                    name: "Budget".to_string(),
                },
            },
            &config,
            &path,
        )
        .unwrap();

        let model = table::load_model(&path).unwrap();
        assert_eq!(model.criterion_names().collect::<Vec<_>>(), vec!["Comfort"]);
        assert_eq!(model.scores("Civic"), Some(&[4.0][..]));
    }

    #[test]
    fn test_run_combos_reports_missing_price() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.csv");
        let mut model = ScoreModel::with_default_criteria(["Budget"]);
        model.add_alternative("X", None).unwrap();
        table::save_model(&path, &model).unwrap();

        let err = run(
            Commands::Combos {
                budget: Some(100.0),
                prices: vec![],
                json: false,
            },
            &Config::default(),
            &path,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no price given for alternative 'X'"));
    }
}
