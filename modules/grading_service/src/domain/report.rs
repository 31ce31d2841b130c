//! Report aggregation over a student's marks

use crate::contract::{Mark, PeriodSummary, ReportSummary, StudentReport, User};

/// Fold a student's marks into per-period and overall summaries.
///
/// Periods follow the configured order; periods no longer configured are
/// appended in name order. Periods without marks are omitted.
pub fn build_report(student: &User, marks: &[Mark], period_order: &[String]) -> StudentReport {
    let mut periods: Vec<PeriodSummary> = Vec::new();
    for mark in marks {
        match periods.iter_mut().find(|p| p.exam_period == mark.exam_period) {
            Some(period) => add_mark(&mut period.summary, mark),
            None => {
                let mut summary = ReportSummary::default();
                add_mark(&mut summary, mark);
                periods.push(PeriodSummary {
                    exam_period: mark.exam_period.clone(),
                    summary,
                });
            }
        }
    }

    periods.sort_by(|a, b| {
        let rank = |name: &str| {
            period_order
                .iter()
                .position(|p| p == name)
                .unwrap_or(period_order.len())
        };
        rank(&a.exam_period)
            .cmp(&rank(&b.exam_period))
            .then_with(|| a.exam_period.cmp(&b.exam_period))
    });

    let mut overall = ReportSummary::default();
    for mark in marks {
        add_mark(&mut overall, mark);
    }

    for period in &mut periods {
        finish(&mut period.summary);
    }
    finish(&mut overall);

    StudentReport {
        student_id: student.id,
        student_name: student.display_name.clone(),
        class_label: student.class_label.clone(),
        periods,
        overall,
    }
}

// average_score holds the running sum of percentages until `finish`
fn add_mark(summary: &mut ReportSummary, mark: &Mark) {
    summary.total_score += mark.score;
    summary.total_possible += mark.total_possible;
    summary.average_score += percentage(mark);
    summary.subject_count += 1;
    summary.grade_counts.record(mark.grade);
}

fn percentage(mark: &Mark) -> f64 {
    if mark.total_possible == 100.0 {
        mark.score
    } else {
        mark.score * 100.0 / mark.total_possible
    }
}

fn finish(summary: &mut ReportSummary) {
    summary.average_score = if summary.subject_count == 0 {
        0.0
    } else {
        summary.average_score / summary.subject_count as f64
    };
}
