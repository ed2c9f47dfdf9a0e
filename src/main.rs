use clap::{Parser, Subcommand};
use eligo_rules::{AttributeMap, CombineStrategy};
use tracing::debug;

#[derive(Parser)]
#[command(name = "eligo")]
#[command(about = "Parse, evaluate and combine eligibility rule expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a rule and print its AST as JSON
    Parse {
        /// Rule text, e.g. "age > 30 AND salary < 50000"
        rule: String,
    },
    /// Check rule syntax without printing the tree
    Validate {
        /// Rule text, e.g. "age > 30 AND salary < 50000"
        rule: String,
    },
    /// Evaluate a rule against a JSON object of user attributes
    Evaluate {
        rule: String,
        /// User attributes as a JSON object, e.g. '{"age": 35}'
        #[arg(long)]
        attributes: String,
    },
    /// Combine several rules into a single AST and print it as JSON
    Combine {
        rules: Vec<String>,
        /// Fold every rule with AND instead of the most frequent operator
        #[arg(long)]
        and_fold: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    match cli.command {
        Commands::Parse { rule } => {
            let ast = eligo_rules::parse_rule(&rule)?;
            println!("{}", serde_json::to_string_pretty(&ast)?);
        }
        Commands::Validate { rule } => {
            eligo_rules::validate_rule(&rule)?;
            println!("rule is valid");
        }
        Commands::Evaluate { rule, attributes } => {
            let ast = eligo_rules::parse_rule(&rule)?;
            let user_attributes: AttributeMap = serde_json::from_str(&attributes)?;
            debug!(rule = %rule, "evaluating rule");
            let verdict = eligo_rules::evaluate_rule(&ast, &user_attributes)?;
            println!("{verdict}");
        }
        Commands::Combine { rules, and_fold } => {
            let strategy = if and_fold {
                CombineStrategy::AndFold
            } else {
                CombineStrategy::MostFrequentOperator
            };
            let ast = eligo_rules::combine_rules_with(&rules, strategy)?;
            println!("{}", serde_json::to_string_pretty(&ast)?);
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
