use clap::Parser;
use qsheet::utils::{logger, validation::Validate};
use qsheet::{CliConfig, HttpSheetSource, LoadStatus, SheetStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting qsheet CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let source = HttpSheetSource::new(config);
    let mut store = SheetStore::new(source);
    let snapshot = store.initialize().await;

    if store.status() == LoadStatus::Offline {
        tracing::warn!("Remote sheet unavailable, starting from an empty sheet");
        println!("⚠ Offline: remote sheet unavailable, showing an empty sheet");
    }

    println!("{}", snapshot.sheet.name);
    if !snapshot.sheet.description.is_empty() {
        println!("{}", snapshot.sheet.description);
    }
    println!();

    let stats = store.stats();
    for group in store.topic_groups() {
        let tally = stats.topic_stats.get(&group.name).copied().unwrap_or_default();
        println!("{} ({}/{} solved)", group.name, tally.solved, tally.total);

        for question in &group.all_questions {
            println!(
                "  [{}] {} ({})",
                if question.is_solved { "x" } else { " " },
                question.title,
                question.question_id.difficulty
            );
        }
        for sub in &group.sub_topics {
            println!("  {}", sub.name);
            for question in &sub.all_questions {
                println!(
                    "    [{}] {} ({})",
                    if question.is_solved { "x" } else { " " },
                    question.title,
                    question.question_id.difficulty
                );
            }
        }
    }

    println!();
    println!(
        "✅ {}/{} solved ({}%)",
        stats.solved_questions, stats.total_questions, stats.progress_percent
    );

    Ok(())
}
