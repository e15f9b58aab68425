//! Plain-text rendering of an [`AuditSession`].

use std::io::{self, Write};

use workfix_core::{AuditMode, AuditSession, MockInsights};

/// Rows shown in the unanswered-comments table.
const TOP_COMMENTS: usize = 10;

/// `60000` -> `"$60,000"`.
pub(crate) fn fmt_money(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

/// Write the human-readable report for `session` to `out`.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub(crate) fn write_report<W: Write>(out: &mut W, session: &AuditSession) -> io::Result<()> {
    let report = &session.report;

    writeln!(out, "AUDIT RESULTS FOR @{}", session.request.handle)?;
    if session.mode == AuditMode::Mock {
        writeln!(out, "(mock audit: synthetic data)")?;
    }
    writeln!(
        out,
        "generated {}  session {}",
        session.generated_at.format("%Y-%m-%d %H:%M UTC"),
        session.id
    )?;
    writeln!(out)?;

    if let Some(profile) = &session.profile {
        let name = profile.full_name.as_deref().unwrap_or("\u{2014}");
        writeln!(
            out,
            "{name}  followers {}  posts {}{}",
            profile.followers,
            profile.post_count,
            if profile.is_private { "  (private)" } else { "" }
        )?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "{:<28}{}",
        "POTENTIAL LOST REVENUE",
        fmt_money(report.potential_revenue)
    )?;
    writeln!(out, "{:<28}{}", "MISSED HIGH-INTENT LEADS", report.estimated_leads)?;
    writeln!(
        out,
        "{:<28}{:.1} per post",
        "AVERAGE ENGAGEMENT", report.average_engagement
    )?;
    writeln!(
        out,
        "{:<28}{} likes / {} comments",
        "SAMPLED TOTALS", report.total_likes, report.total_comments
    )?;
    writeln!(out)?;

    writeln!(out, "{:<12}{:>8}{:>10}  CAPTION", "DATE", "LIKES", "COMMENTS")?;
    for sample in &session.samples {
        writeln!(
            out,
            "{:<12}{:>8}{:>10}  {}",
            sample.date.format("%Y-%m-%d"),
            sample.like_count,
            sample.comment_count,
            sample.caption_excerpt
        )?;
    }

    if let Some(insights) = &session.insights {
        writeln!(out)?;
        write_insights(out, insights)?;
    }

    Ok(())
}

fn write_insights<W: Write>(out: &mut W, insights: &MockInsights) -> io::Result<()> {
    let headline = &insights.headline;
    writeln!(
        out,
        "{:<28}{}",
        "AVERAGE RESPONSE TIME", headline.response_time
    )?;
    writeln!(
        out,
        "{:<28}{}%",
        "REPLY RATE ON SALES COMMENTS", headline.reply_rate_percent
    )?;
    writeln!(
        out,
        "{:<28}{}",
        "EFFICIENCY SCORE", headline.efficiency_grade
    )?;
    writeln!(out)?;

    writeln!(out, "Comment volume vs. replies (last 7 days)")?;
    writeln!(out, "{:<8}{:>10}{:>9}", "DATE", "COMMENTS", "REPLIES")?;
    for point in &insights.volume {
        writeln!(
            out,
            "{:<8}{:>10}{:>9}",
            point.date.format("%m/%d"),
            point.comments,
            point.replies
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Recent unanswered high-intent comments")?;
    writeln!(
        out,
        "{:<12}{:<20}{:<14}VALUE",
        "USER", "COMMENT", "IGNORED"
    )?;
    for comment in insights.comments.iter().take(TOP_COMMENTS) {
        let ignored = format!("{} days ago", comment.days_ignored);
        writeln!(
            out,
            "{:<12}{:<20}{:<14}{}",
            comment.user,
            comment.text,
            ignored,
            fmt_money(comment.potential_value)
        )?;
    }

    Ok(())
}
