// Colored terminal output for analysis results and stored buckets.

use colored::Colorize;

use crate::models::{AnalysisResult, Item, TopicDescriptor};

/// Items listed under each topic before collapsing into "...and N more".
const ITEMS_PER_TOPIC: usize = 5;
const TITLE_WIDTH: usize = 80;

/// Display a full analysis: summary, emerging then continuing topics with
/// their top items, then the historical topics that faded.
pub fn display_analysis(result: &AnalysisResult) {
    println!(
        "\n{}",
        format!("=== Topics for {} {}:00 ===", result.date, result.hour).bold()
    );

    if result.topics.is_empty() {
        println!("No items to analyze.");
        return;
    }

    let trends = &result.trends;
    println!(
        "  {} topics: {} emerging, {} continuing, {} fading",
        result.topics.len(),
        trends.emerging.len().to_string().green(),
        trends.continuing.len().to_string().cyan(),
        trends.fading.len().to_string().dimmed(),
    );

    for topic in topics_in(result, &trends.emerging) {
        println!("\n  {} {}", "NEW".green().bold(), topic_heading(topic));
        display_items(result.items_for(topic.id));
    }

    for continuation in &trends.continuing {
        let Some(topic) = result.topics.iter().find(|t| t.id == continuation.topic) else {
            continue;
        };
        println!(
            "\n  {} {} {}",
            "CONT".cyan().bold(),
            topic_heading(topic),
            format!(
                "(was topic {}, similarity {:.2})",
                continuation.historical, continuation.similarity
            )
            .dimmed()
        );
        display_items(result.items_for(topic.id));
    }

    if !trends.fading.is_empty() {
        let ids: Vec<String> = trends.fading.iter().map(|id| id.to_string()).collect();
        println!(
            "\n  {} previous-hour topics faded: {}",
            "~".yellow(),
            ids.join(", ").dimmed()
        );
    }
    println!();
}

/// Display the topics stored for one bucket.
pub fn display_bucket(key: &str, topics: &[TopicDescriptor]) {
    println!("\n{}", format!("=== Stored topics for {key} ===").bold());
    if topics.is_empty() {
        println!("  (no topics)");
        return;
    }
    for topic in topics {
        println!("  {}", topic_heading(topic));
        for (term, weight) in &topic.keywords {
            println!("      {:<24} {:.3}", term, weight);
        }
    }
    println!();
}

fn topics_in<'a>(
    result: &'a AnalysisResult,
    ids: &'a [usize],
) -> impl Iterator<Item = &'a TopicDescriptor> + 'a {
    ids.iter()
        .filter_map(|id| result.topics.iter().find(|t| t.id == *id))
}

fn topic_heading(topic: &TopicDescriptor) -> String {
    let label = if topic.keywords.is_empty() {
        "(general)".dimmed().to_string()
    } else {
        topic.label().bold().to_string()
    };
    format!(
        "#{} {} {}",
        topic.id,
        label,
        format!("[{} items]", topic.size).dimmed()
    )
}

fn display_items(items: &[Item]) {
    let mut ranked: Vec<&Item> = items.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    for item in ranked.iter().take(ITEMS_PER_TOPIC) {
        println!(
            "      {:>5}  {}",
            item.score.to_string().yellow(),
            super::truncate_chars(&item.title, TITLE_WIDTH)
        );
        println!("             {}", super::item_link(item).dimmed());
    }
    if ranked.len() > ITEMS_PER_TOPIC {
        println!(
            "      {}",
            format!("...and {} more", ranked.len() - ITEMS_PER_TOPIC).dimmed()
        );
    }
}
