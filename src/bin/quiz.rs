use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use pdf_quiz::config::GeneratorArgs;
use pdf_quiz::request::Document;
use pdf_quiz::session::{OptionMark, QuizSession, SessionState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Generate a quiz from a PDF and take it in the terminal", long_about = None)]
struct Args {
    /// PDF document to build the quiz from
    pdf: PathBuf,

    /// Log filter (logs go to stderr)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log: String,

    #[command(flatten)]
    generator: GeneratorArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(std::io::stderr)
        .init();

    let bytes = tokio::fs::read(&args.pdf)
        .await
        .with_context(|| format!("failed to read {}", args.pdf.display()))?;
    let mut document = Document::pdf(bytes);
    if let Some(name) = args.pdf.file_name() {
        document = document.with_file_name(name.to_string_lossy());
    }

    let generator = args.generator.build_generator();
    let mut session = QuizSession::new();

    session.begin_submission()?;
    println!("Generating quiz from {} ...", args.pdf.display());
    let outcome = generator.generate(Some(document)).await;
    session.complete(outcome)?;

    if let SessionState::Failed(reason) = session.state() {
        bail!("quiz generation failed: {}", reason);
    }
    let Some(quiz) = session.quiz().cloned() else {
        bail!("no quiz was produced");
    };

    println!("\n{}\n", quiz.title);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    for (qi, question) in quiz.questions.iter().enumerate() {
        println!("Question {}: {}", qi + 1, question.question);
        for (oi, option) in question.options.iter().enumerate() {
            println!("  {}) {}", oi + 1, option);
        }
        // Every question needs an answer before results
        loop {
            println!("Your answer (1-{}):", question.options.len());
            let Some(line) = lines.next_line().await? else {
                bail!("input ended before question {} was answered", qi + 1);
            };
            match line.trim().parse::<usize>() {
                Ok(n) if n >= 1 && session.select_answer(qi, n - 1).is_ok() => break,
                _ => println!("Please enter a number between 1 and {}.", question.options.len()),
            }
        }
        println!();
    }

    let report = session.show_results()?;
    for (qi, question) in quiz.questions.iter().enumerate() {
        println!("Question {}: {}", qi + 1, question.question);
        for (oi, option) in question.options.iter().enumerate() {
            let marker = match session.option_mark(qi, oi) {
                OptionMark::Correct => "[correct]",
                OptionMark::Incorrect => "[your answer]",
                OptionMark::Neutral => "",
            };
            println!("  {}) {} {}", oi + 1, option, marker);
        }
    }
    println!(
        "\nYour score: {}/{} ({}%)",
        report.correct,
        report.total,
        report.percent()
    );
    Ok(())
}
