use crate::infra::{parse_date, parse_phase, InMemorySessionRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use homekey::config::{AppConfig, CoachConfig};
use homekey::error::AppError;
use homekey::workflows::coach::{ChatRole, CoachSessionService};
use homekey::workflows::packet::REQUIRED_DOCUMENTS;
use homekey::workflows::readiness::{
    dated_timeline, format_dollars, overlay_phases, project_readiness, project_timeline,
    validate_dpa_amount, Phase, PhaseProgress, ReadinessScore, ReadinessSession, TimelineView,
    UserProfile,
};
use homekey::workflows::signup::{SignupImport, SignupImporter};
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_DPA_AMOUNT: f64 = 5700.0;

const DEMO_CHAT: [&str; 7] = [
    "I'd like to buy my first home next year",
    "Raleigh 27610",
    "3,900",
    "270",
    "630",
    "6,200",
    "195000",
];

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Monthly take-home income
    #[arg(long)]
    pub(crate) income: f64,
    /// Self-reported credit score (300-850)
    #[arg(long)]
    pub(crate) credit_score: Option<u16>,
    /// Liquid savings available for down payment, closing, and reserves
    #[arg(long)]
    pub(crate) savings: f64,
    #[arg(long)]
    pub(crate) price_min: f64,
    #[arg(long)]
    pub(crate) price_max: f64,
    /// Minimum monthly debt payments
    #[arg(long, default_value_t = 0.0)]
    pub(crate) debts: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) rent: f64,
    /// Down payment percent (defaults to the configured value)
    #[arg(long)]
    pub(crate) down_payment: Option<f64>,
    /// Zip code or city (defaults to the configured region)
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Down payment assistance awarded so far
    #[arg(long, default_value_t = 0.0)]
    pub(crate) dpa: f64,
    /// Lender packet completeness percent
    #[arg(long, default_value_t = 0.0)]
    pub(crate) packet: f64,
    /// Evaluation date for milestone dates (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Completed checklist phase, in order (repeatable)
    #[arg(long, value_parser = parse_phase)]
    pub(crate) completed: Vec<Phase>,
}

impl ScoreArgs {
    fn profile(&self, config: &CoachConfig) -> UserProfile {
        config.fill_profile_defaults(UserProfile {
            net_monthly_income: self.income,
            monthly_debts: self.debts,
            monthly_rent: self.rent,
            credit_score: self.credit_score,
            savings: self.savings,
            target_price_min: self.price_min,
            target_price_max: self.price_max,
            down_payment_pct: self.down_payment,
            region: self.region.clone(),
            ..UserProfile::default()
        })
    }
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Signup CSV export to score
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the demo date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the scripted intake conversation
    #[arg(long)]
    pub(crate) skip_chat: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?.coach;
    let (profile, readiness, timeline) = score_from_args(&args, &config)?;

    println!(
        "Readiness for a {} target home",
        format_dollars(profile.target_price().round() as u32)
    );
    render_score(&readiness);
    render_timeline(&timeline);
    Ok(())
}

fn score_from_args(
    args: &ScoreArgs,
    config: &CoachConfig,
) -> Result<(UserProfile, ReadinessScore, TimelineView), AppError> {
    let profile = args.profile(config);
    profile.validate()?;
    let dpa_amount = validate_dpa_amount(args.dpa)?;
    let progress = PhaseProgress::from_phases(args.completed.iter().copied())?;

    let readiness = project_readiness(&profile, dpa_amount, args.packet, &progress);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let milestones = overlay_phases(&project_timeline(readiness.eta_weeks), &progress);
    let timeline = dated_timeline(readiness.eta_weeks, &milestones, today);

    Ok((profile, readiness, timeline))
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?.coach;
    let import = SignupImporter::from_path(&args.csv, &config)?;
    render_import(&import);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?.coach;
    walk_demo(args, &config);
    Ok(())
}

fn walk_demo(args: DemoArgs, config: &CoachConfig) {
    let DemoArgs { today, skip_chat } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("HomeKey readiness demo ({today})");

    if !skip_chat {
        run_chat_demo(config, today);
    }

    println!("\nReadiness journey");
    let mut session = ReadinessSession::with_profile(demo_profile(config));
    print_checkpoint("Initial assessment", &session);

    for document in REQUIRED_DOCUMENTS.iter() {
        if let Err(err) = session.record_document(document.key, today) {
            println!("  Upload rejected: {err}");
        }
    }
    print_checkpoint("All packet documents uploaded", &session);

    session.set_dpa_amount(DEMO_DPA_AMOUNT);
    print_checkpoint(
        &format!(
            "{} down payment assistance awarded",
            format_dollars(DEMO_DPA_AMOUNT as u32)
        ),
        &session,
    );

    for phase in Phase::ordered() {
        match session.complete_phase(phase) {
            Ok(_) => print_checkpoint(&format!("{} complete", phase.label()), &session),
            Err(err) => println!("  Phase update rejected: {err}"),
        }
    }

    if let Some(timeline) = session.timeline(today) {
        render_timeline(&timeline);
    }
}

fn run_chat_demo(config: &CoachConfig, today: NaiveDate) {
    println!("\nIntake conversation");
    let service = CoachSessionService::new(
        Arc::new(InMemorySessionRepository::default()),
        config.clone(),
    );

    let record = match service.start_session(today) {
        Ok(record) => record,
        Err(err) => {
            println!("  Session unavailable: {err}");
            return;
        }
    };
    for message in &record.transcript {
        print_chat_line(message.role, &message.content);
    }

    for answer in DEMO_CHAT {
        print_chat_line(ChatRole::Buyer, answer);
        match service.send_message(&record.id, answer) {
            Ok(outcome) => print_chat_line(ChatRole::Assistant, &outcome.reply),
            Err(err) => {
                println!("  Message rejected: {err}");
                return;
            }
        }
    }
}

fn print_chat_line(role: ChatRole, content: &str) {
    let speaker = match role {
        ChatRole::Assistant => "Coach",
        ChatRole::Buyer => "Buyer",
    };
    let mut lines = content.lines();
    if let Some(first) = lines.next() {
        println!("  {speaker}: {first}");
    }
    for line in lines {
        println!("         {line}");
    }
}

fn demo_profile(config: &CoachConfig) -> UserProfile {
    config.fill_profile_defaults(UserProfile {
        net_monthly_income: 3900.0,
        monthly_debts: 270.0,
        monthly_rent: 1300.0,
        credit_score: Some(630),
        savings: 6200.0,
        target_price_min: 180_000.0,
        target_price_max: 210_000.0,
        household_size: Some(2),
        first_time_buyer: Some(true),
        ..UserProfile::default()
    })
}

fn print_checkpoint(title: &str, session: &ReadinessSession) {
    println!("\n- {title}");
    match session.score() {
        Some(score) => render_score(&score),
        None => println!("  No profile on file"),
    }
}

fn render_score(score: &ReadinessScore) {
    let bonus = if score.bonus > 0 {
        format!(" (+{} from completed phases)", score.bonus)
    } else {
        String::new()
    };
    println!("  Readiness score: {}/100{bonus}", score.score);
    println!(
        "  Estimated payment: {}-{}/month",
        format_dollars(score.piti_low),
        format_dollars(score.piti_high)
    );
    for (name, sub) in score.breakdown.entries() {
        println!("    - {name}: {} (weight {}%)", sub.score, sub.weight);
    }
    match score.eta.binding_constraint() {
        Some(constraint) => println!(
            "  Lender-ready in {} weeks (limited by {constraint})",
            score.eta_weeks
        ),
        None => println!("  Lender-ready now"),
    }
    println!("  Reserves: {:.1} months", score.reserves_months);
}

fn render_timeline(timeline: &TimelineView) {
    println!(
        "\nMilestones (target {}, {} weeks)",
        timeline.target_date, timeline.eta_weeks
    );
    for milestone in &timeline.milestones {
        println!(
            "  - [{}] {} | week {} | {}",
            milestone.status_label, milestone.title, milestone.weeks, milestone.target_date
        );
    }
}

fn render_import(import: &SignupImport) {
    println!(
        "Scored {} signups ({} rejected)",
        import.scored.len(),
        import.rejected.len()
    );
    if let Some(average) = import.average_score() {
        println!("Average readiness: {average:.1}/100");
    }
    println!("Lender-ready now: {}", import.lender_ready().count());

    for entry in &import.scored {
        println!(
            "  line {} | {} | score {} | {}-{}/month | {} weeks",
            entry.line,
            entry.email.as_deref().unwrap_or("(no email)"),
            entry.readiness.score,
            format_dollars(entry.readiness.piti_low),
            format_dollars(entry.readiness.piti_high),
            entry.readiness.eta_weeks
        );
    }
    for rejected in &import.rejected {
        println!("  line {} rejected: {}", rejected.line, rejected.reason);
    }
}
