use crate::infra::{parse_date, parse_role, parse_star, InMemoryReviewRepository};
use chrono::NaiveDate;
use clap::Args;
use imobireview::config::DEFAULT_SCAN_DELAY_MS;
use imobireview::error::AppError;
use imobireview::workflows::reviews::criteria::{
    condominium_available, condominium_criteria, counterpart_roles,
};
use imobireview::workflows::reviews::{
    criteria_for, DocumentDescriptor, DocumentVerifier, ReputationSummary, ReviewRepository,
    ReviewService, ReviewServiceError, Role, ScanOutcome, ScreenView, SessionCommand, SessionId,
    SimulatedVerifier, StarScore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct CriteriaArgs {
    /// Role of the person writing the review
    #[arg(long, value_parser = parse_role)]
    pub(crate) reviewer: Role,
    /// Limit the output to one reviewee role
    #[arg(long, value_parser = parse_role)]
    pub(crate) reviewee: Option<Role>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// CPF or CNPJ of the party being reviewed
    #[arg(long, default_value = "123.456.789-09")]
    pub(crate) identifier: String,
    /// Role the reviewer claims and proves with the contract
    #[arg(long, value_parser = parse_role, default_value = "tenant")]
    pub(crate) reviewer: Role,
    /// Role being reviewed. Defaults to the first counterpart of the reviewer.
    #[arg(long, value_parser = parse_role)]
    pub(crate) reviewee: Option<Role>,
    /// Contract document to upload; its extension decides the content type
    #[arg(long, default_value = "contract.pdf")]
    pub(crate) document: PathBuf,
    /// Contract start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, default_value = "2023-01-01")]
    pub(crate) contract_start: NaiveDate,
    /// Contract end date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, default_value = "2024-01-01")]
    pub(crate) contract_end: NaiveDate,
    /// Star scores applied to the criteria in order
    #[arg(long, value_parser = parse_star, value_delimiter = ',', default_value = "5,4,5,4")]
    pub(crate) scores: Vec<StarScore>,
    /// Condominium scores; tenants only
    #[arg(long, value_parser = parse_star, value_delimiter = ',')]
    pub(crate) condo_scores: Vec<StarScore>,
    /// Publish without the reviewer's role label
    #[arg(long)]
    pub(crate) anonymous: bool,
    /// Simulated verification delay in milliseconds
    #[arg(long, default_value_t = DEFAULT_SCAN_DELAY_MS)]
    pub(crate) scan_delay_ms: u64,
}

pub(crate) fn run_criteria(args: CriteriaArgs) -> Result<(), AppError> {
    let reviewees: Vec<Role> = match args.reviewee {
        Some(reviewee) => vec![reviewee],
        None => Role::ordered()
            .into_iter()
            .filter(|role| *role != args.reviewer)
            .collect(),
    };

    for reviewee in reviewees {
        let criteria = criteria_for(args.reviewer, reviewee);
        println!("{} reviewing {}", args.reviewer, reviewee);
        if criteria.is_empty() {
            println!("  (no criteria: a {} cannot review a {})", args.reviewer, reviewee);
            continue;
        }
        for (index, criterion) in criteria.iter().enumerate() {
            println!("  {}. {}", index + 1, criterion);
        }
    }

    if condominium_available(args.reviewer) {
        println!("Condominium (optional)");
        for (index, criterion) in condominium_criteria().iter().enumerate() {
            println!("  {}. {}", index + 1, criterion);
        }
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryReviewRepository::default());
    let verifier = Arc::new(SimulatedVerifier::new(Duration::from_millis(
        args.scan_delay_ms,
    )));
    let service = ReviewService::new(repository, verifier);

    println!("ImobiReview demo");
    let session = service.start_review(&args.identifier)?;
    let session_id = session.session_id;
    println!("Reviewing {} as {}", args.identifier.trim(), args.reviewer);

    apply(
        &service,
        &session_id,
        [
            SessionCommand::SelectReviewerRole {
                role: args.reviewer,
            },
            SessionCommand::Next,
        ],
    )?;

    let content_type = mime_guess::from_path(&args.document).first_or_octet_stream();
    let document = DocumentDescriptor::new(
        args.document.display().to_string(),
        content_type.essence_str(),
    );
    println!(
        "Uploading {} ({}), scanning for {} ms...",
        document.name, document.content_type, args.scan_delay_ms
    );
    let upload = match service.upload_document(&session_id, document).await {
        Ok(upload) => upload,
        Err(ReviewServiceError::Navigation(err)) => {
            println!("Upload refused: {err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    match upload.scan {
        ScanOutcome::Verified => println!("Document verified"),
        ScanOutcome::Rejected { reason } => {
            println!("Document rejected: {reason}");
            return Ok(());
        }
        ScanOutcome::Stale => {
            println!("Scan result arrived after the upload was replaced");
            return Ok(());
        }
    }

    let reviewee = args
        .reviewee
        .unwrap_or(counterpart_roles(args.reviewer)[0]);

    apply(
        &service,
        &session_id,
        [
            SessionCommand::ConfirmValidation,
            SessionCommand::SelectReviewee { role: reviewee },
            SessionCommand::Next,
            SessionCommand::SetContractStart {
                date: args.contract_start,
            },
            SessionCommand::SetContractEnd {
                date: args.contract_end,
            },
            SessionCommand::Next,
        ],
    )?;

    let mut scoring = score_commands(criteria_for(args.reviewer, reviewee), &args.scores);
    if !args.condo_scores.is_empty() {
        scoring.push(SessionCommand::SetInCondo { enabled: true });
        scoring.extend(score_commands(condominium_criteria(), &args.condo_scores));
    }
    apply(&service, &session_id, scoring)?;
    print_scores(&service, &session_id)?;

    let mut narrative = vec![
        SessionCommand::Next,
        SessionCommand::SetTitle {
            title: format!("My experience with this {}", reviewee.label().to_lowercase()),
        },
        SessionCommand::SetComment {
            comment: "Scripted review written by the ImobiReview demo.".to_string(),
        },
    ];
    if justification_needed(&service, &session_id)? {
        narrative.push(SessionCommand::SetJustification {
            justification: "Low scores reflect repeated unanswered requests.".to_string(),
        });
    }
    narrative.push(SessionCommand::Next);
    narrative.push(SessionCommand::SetAnonymous {
        anonymous: args.anonymous,
    });
    apply(&service, &session_id, narrative)?;

    let response = service.command(&session_id, SessionCommand::Next)?;
    let Some(review) = response.submitted else {
        println!("The review was not submitted");
        return Ok(());
    };
    println!(
        "Published {} by {} (overall {:.1})",
        review.id.0,
        review.author_label(),
        review.overall_score
    );

    render_reputation(&service.reputation(&review.reviewee)?);
    Ok(())
}

fn apply<R, V>(
    service: &ReviewService<R, V>,
    session_id: &SessionId,
    commands: impl IntoIterator<Item = SessionCommand>,
) -> Result<(), ReviewServiceError>
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    for command in commands {
        service.command(session_id, command)?;
    }
    Ok(())
}

/// One score command per criterion; missing values repeat the last one given.
fn score_commands(criteria: &[&str], values: &[StarScore]) -> Vec<SessionCommand> {
    criteria
        .iter()
        .enumerate()
        .filter_map(|(index, criterion)| {
            let score = values.get(index).or_else(|| values.last()).copied()?;
            Some(SessionCommand::Score {
                criterion: (*criterion).to_string(),
                score,
            })
        })
        .collect()
}

fn print_scores<R, V>(
    service: &ReviewService<R, V>,
    session_id: &SessionId,
) -> Result<(), ReviewServiceError>
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    if let ScreenView::CreateReview { review, .. } = service.session(session_id)?.screen {
        for row in review.criteria.iter().chain(&review.condominium_criteria) {
            let stars: String = row
                .stars
                .iter()
                .map(|cell| if cell.filled { '*' } else { '.' })
                .collect();
            println!("  {:<32} {}", row.criterion, stars);
        }
        println!("Overall score: {:.1}", review.scores.overall);
        if review.is_in_condo {
            println!("Condominium score: {:.1}", review.scores.condo);
        }
    }
    Ok(())
}

fn justification_needed<R, V>(
    service: &ReviewService<R, V>,
    session_id: &SessionId,
) -> Result<bool, ReviewServiceError>
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    Ok(match service.session(session_id)?.screen {
        ScreenView::CreateReview { review, .. } => review.justification_required,
        _ => false,
    })
}

fn render_reputation(summary: &ReputationSummary) {
    println!("\nReputation for {}", summary.reviewee);
    println!(
        "  {} review(s), overall {:.1} / {}",
        summary.total_reviews,
        summary.overall_reputation,
        StarScore::MAX
    );
    if let Some(condo) = summary.condominium_reputation {
        println!("  condominium {:.1} / {}", condo, StarScore::MAX);
    }
    for average in &summary.criteria_averages {
        println!(
            "  - {:<32} {:.1} ({} review(s))",
            average.subject, average.score, average.reviews
        );
    }
    for card in &summary.recent_reviews {
        println!(
            "  \"{}\" by {} [{}] {:.1}",
            card.title, card.author, card.contract_period, card.overall_score
        );
    }
}
