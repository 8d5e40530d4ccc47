//! Attendance statistics and the attendant CSV report.

use crate::errors::RsvpError;
use crate::messages::ATTENDANT_CSV_HEADERS;
use crate::models::{AttendantReportRow, MealStat, ResponseStatus, StatsResponse};
use crate::repositories::attendants;
use csv::{QuoteStyle, WriterBuilder};
use sqlx::PgPool;
use tracing::{error, instrument};

#[instrument(skip_all, name = "rsvp.services.stats.summary")]
pub async fn summary(pool: &PgPool) -> Result<StatsResponse, RsvpError> {
    let pending_attendants = attendants::count_by_status(pool, ResponseStatus::Pending).await?;
    let accepted_attendants = attendants::count_by_status(pool, ResponseStatus::Accepted).await?;
    let declined_attendants = attendants::count_by_status(pool, ResponseStatus::Declined).await?;

    let meal_stats = attendants::meal_counts(pool)
        .await?
        .into_iter()
        .map(|row| MealStat {
            name: row.name,
            count: row.count,
        })
        .collect();

    Ok(StatsResponse {
        pending_attendants,
        accepted_attendants,
        declined_attendants,
        meal_stats,
    })
}

#[instrument(skip_all, name = "rsvp.services.stats.attendant_report")]
pub async fn attendant_report(pool: &PgPool) -> Result<String, RsvpError> {
    let rows = attendants::report_rows(pool).await?;
    render_csv(&rows)
}

fn report_error(e: impl std::fmt::Display) -> RsvpError {
    error!(target: "rsvp.services.stats", error = %e, "Failed to write attendant report");
    RsvpError::Internal
}

/// Render report rows as CSV with every field quoted.
pub fn render_csv(rows: &[AttendantReportRow]) -> Result<String, RsvpError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(ATTENDANT_CSV_HEADERS).map_err(report_error)?;

    for row in rows {
        writer
            .write_record([
                row.party.as_str(),
                row.name.as_str(),
                row.response_status.as_str(),
                row.meal.as_deref().unwrap_or(""),
            ])
            .map_err(report_error)?;
    }

    let bytes = writer.into_inner().map_err(report_error)?;
    String::from_utf8(bytes).map_err(report_error)
}
