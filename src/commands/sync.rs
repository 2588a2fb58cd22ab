//! One run: read the Trello list, schedule, clear the tasks calendar, write.

use anyhow::Result;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tracing::{info, warn};
use trellocal_core::schedule::{self, Slot};
use trellocal_core::{Plan, ScheduleMode, TaskCalendar, TaskRecord, TaskSource, sync};
use trellocal_google::GoogleCalendar;
use trellocal_trello::{TrelloAuth, TrelloClient, TrelloReader};

use crate::commands::auth;
use crate::config::Config;
use crate::render::Render;
use crate::utils::tui;

pub struct SyncOptions {
    /// Read and schedule only; never touch the tasks calendar or cards
    pub dry_run: bool,
    /// Write scheduled dates back to cards (slot mode)
    pub write_card_dates: bool,
}

/// The two calendars a run works with.
struct Calendars<C> {
    /// Holds the slot markers; only ever read
    main: C,
    /// Cleared and rewritten
    tasks: C,
}

pub async fn run(config: &Config, options: SyncOptions) -> Result<()> {
    let anchor = config.anchor(Utc::now());
    info!(mode = %config.schedule_mode, %anchor, dry_run = options.dry_run, "starting run");

    // A due-date dry run never needs Google; everything else authorizes first
    // so that no mutation happens before consent is complete.
    let session = if options.dry_run && config.schedule_mode == ScheduleMode::Due {
        None
    } else {
        Some(auth::authorize(config).await?)
    };

    let calendars = session.as_ref().map(|session| Calendars {
        main: GoogleCalendar::new(session, &config.calendar_main_id),
        tasks: GoogleCalendar::new(session, &config.calendar_tasks_id),
    });

    let reader = TrelloReader::new(
        TrelloClient::new(TrelloAuth {
            api_key: config.trello_api_key.clone(),
            token: config.trello_token.clone(),
        }),
        &config.list_id,
        &config.estimate_field_id,
    );

    let spinner = tui::create_spinner("Checking Trello estimate field");
    let verified = reader.verify_estimate_field().await;
    spinner.finish_and_clear();
    verified?;

    let Some(plan) = execute(config, &options, anchor, &reader, calendars.as_ref()).await? else {
        return Ok(());
    };

    if config.schedule_mode == ScheduleMode::Slots && options.write_card_dates {
        let written = sync::write_card_dates(reader.client(), &plan).await?;
        for schedule in &plan.card_dates {
            println!("   {}", schedule.render());
        }
        println!("Updated dates on {} cards", written);
    }

    Ok(())
}

/// Read, schedule, then (unless dry-running) mirror the plan onto the tasks
/// calendar. Returns the plan that was written, or `None` when nothing was.
async fn execute<S, C>(
    config: &Config,
    options: &SyncOptions,
    anchor: DateTime<Utc>,
    source: &S,
    calendars: Option<&Calendars<C>>,
) -> Result<Option<Plan>>
where
    S: TaskSource,
    C: TaskCalendar,
{
    let spinner = tui::create_spinner("Reading Trello list");
    let tasks = source.fetch_tasks().await;
    spinner.finish_and_clear();
    let tasks = tasks?;

    println!("Read {} cards from Trello", tasks.len());

    let plan = match (calendars, config.schedule_mode) {
        (Some(calendars), ScheduleMode::Slots) => {
            plan_into_slots(config, &calendars.main, &tasks, anchor).await?
        }
        _ => schedule::by_due_date(&tasks, anchor),
    };

    for task in &plan.unscheduled {
        warn!(card = %task.title, remaining = %task.estimate, "card did not fit in any slot");
    }

    println!("\n📅 {}", config.calendar_tasks_id);
    println!("{}", plan.render());

    let Some(calendars) = calendars.filter(|_| !options.dry_run) else {
        println!("\nDry run, nothing written.");
        return Ok(None);
    };

    let spinner = tui::create_spinner(format!("Writing {}", config.calendar_tasks_id));
    let report = sync::mirror(&calendars.tasks, &plan).await;
    spinner.finish_and_clear();
    let report = report?;

    println!(
        "\n{} {} deleted, {} created",
        "Synced:".green(),
        report.deleted,
        report.created.len()
    );

    Ok(Some(plan))
}

async fn plan_into_slots<C: TaskCalendar>(
    config: &Config,
    main: &C,
    tasks: &[TaskRecord],
    anchor: DateTime<Utc>,
) -> Result<Plan> {
    let spinner = tui::create_spinner(format!("Reading slots from {}", config.calendar_main_id));
    let events = main.list_events(Some(anchor)).await;
    spinner.finish_and_clear();

    let slots = Slot::from_events(&events?, &config.slot_event_name, anchor);
    println!(
        "Found {} '{}' slots from {}",
        slots.len(),
        config.slot_event_name,
        anchor.format("%Y-%m-%d %H:%M")
    );

    Ok(schedule::into_slots(tasks, &slots))
}
