use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;

use masteryapp_client::flow::{Advance, FlowState, QuizFlow, QUESTION_TRANSITION};
use masteryapp_client::models::QuizConfigForm;
use masteryapp_client::utils::time::format_elapsed;
use masteryapp_client::{ApiClient, AppStores, Config};

/// Terminal quiz runner: pick a course, generate a quiz, answer the
/// questions, see the graded result.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "masteryapp_client=info".into()),
        )
        .init();

    let config = Config::load().context("failed to load configuration")?;
    tracing::info!("Using backend at {}", config.api_base_url);

    let api = Arc::new(ApiClient::new(&config).context("failed to build API client")?);
    let stores = AppStores::new(api);
    stores.bootstrap().await;

    let auth = stores.auth.state();
    if !auth.logged_in {
        eprintln!("Not logged in. Sign in through the web app first, then retry.");
        std::process::exit(1);
    }
    println!(
        "Signed in as {}.",
        auth.username.as_deref().unwrap_or("unknown user")
    );

    let Some(course) = pick_course(&stores) else {
        eprintln!("No courses available. Create one through the web app first.");
        std::process::exit(1);
    };
    println!("Selected course: {}", course.name);

    let mut quiz_config = QuizConfigForm {
        name: format!("{} quiz", course.name),
        course: course.id.clone(),
        ..QuizConfigForm::default()
    };
    if let Some(length) = prompt_number("Number of questions [5]: ") {
        quiz_config.quiz_length = length;
    }

    let Some(quiz) = stores.quizzes.create_quiz(&quiz_config).await else {
        let status = stores.quizzes.status();
        eprintln!(
            "Could not create quiz: {}",
            status.error.as_deref().unwrap_or("unknown error")
        );
        std::process::exit(1);
    };
    println!("Created quiz \"{}\" with {} questions.\n", quiz.name, quiz.quiz_length);

    let mut flow = match QuizFlow::start(&stores.quizzes, &stores.questions) {
        Ok(flow) => flow,
        Err(e) => {
            eprintln!("Could not start quiz: {}", e);
            std::process::exit(1);
        }
    };

    while flow.state() != FlowState::Done {
        let Some(question) = flow.current_question().cloned() else {
            break;
        };

        println!(
            "Question {} of {}  ({})",
            flow.question_number(),
            flow.total_questions(),
            format_elapsed(flow.elapsed_secs())
        );
        println!("{}", question.question);
        for (i, choice) in question.choices.iter().enumerate() {
            println!("  {}. {}", i + 1, choice);
        }

        let Some(picked) = prompt_number("Your answer: ") else {
            println!("Please enter the number of a choice.\n");
            continue;
        };
        let choice = picked.saturating_sub(1);

        match flow.answer(&stores.responses, choice) {
            Ok(Advance::NextQuestion) => {
                println!();
                tokio::time::sleep(QUESTION_TRANSITION).await;
                flow.finish_transition();
            }
            Ok(Advance::ReadyToSubmit) => {
                println!("\nSubmitting...");
                match flow
                    .submit(&stores.quizzes, &stores.questions, &stores.responses)
                    .await
                {
                    Some(result) => {
                        println!("\nQuiz Completed!  {}", result.performance_label());
                        println!(
                            "Score: {}%  ({} / {} correct, {})",
                            result.percentage(),
                            result.correct_answers,
                            result.total_questions,
                            format_elapsed(result.time_taken)
                        );
                    }
                    None => {
                        let status = stores.quizzes.status();
                        eprintln!(
                            "Submit failed: {}",
                            status.error.as_deref().unwrap_or("unknown error")
                        );
                        std::process::exit(1);
                    }
                }
            }
            Err(e) => println!("{}\n", e),
        }
    }

    Ok(())
}

fn pick_course(stores: &AppStores) -> Option<masteryapp_client::models::Course> {
    let courses = stores.courses.courses();
    if courses.is_empty() {
        return None;
    }

    println!("Courses:");
    for (i, course) in courses.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, course.name, course.description);
    }

    let picked = prompt_number("Pick a course [1]: ").unwrap_or(1);
    let index = (picked.saturating_sub(1)) as usize;
    courses.get(index.min(courses.len() - 1)).cloned()
}

fn prompt_number(message: &str) -> Option<u32> {
    print!("{}", message);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;
    line.trim().parse().ok()
}
