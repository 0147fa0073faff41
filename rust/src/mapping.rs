//! Assembly of the caller-facing dependency mapping.

use chrono::{Days, NaiveDate};

use crate::config::MappingConfig;
use crate::cpm::{analyze, ScheduleAnalysis};
use crate::graph::TaskGraph;
use crate::models::{
    CriticalPathSummary, DependencyEntry, DependencyMapping, IssueType, ParallelOpportunity,
    PredecessorLink, RequestIdentity, Task,
};
use crate::validation::{validate_tasks, MappingError};
use crate::{log_pass, log_summary};

/// Validate the tasks, run the CPM engine and build the full mapping.
///
/// Day offsets are turned into dates by plain calendar-day addition to
/// `reference_date`.
///
/// # Errors
/// * Input contract violations (empty list, duplicate or empty codes,
///   negative durations, durations whose total overflows, too many tasks)
/// * `DateOutOfRange` if an offset cannot be represented as a date
pub fn map_dependencies(
    tasks: &[Task],
    reference_date: NaiveDate,
    config: &MappingConfig,
) -> Result<DependencyMapping, MappingError> {
    map_dependencies_with_identity(tasks, reference_date, RequestIdentity::default(), config)
}

/// Same as [`map_dependencies`], echoing `identity` into the result.
pub fn map_dependencies_with_identity(
    tasks: &[Task],
    reference_date: NaiveDate,
    identity: RequestIdentity,
    config: &MappingConfig,
) -> Result<DependencyMapping, MappingError> {
    validate_tasks(tasks)?;
    let graph = TaskGraph::build(tasks)?;
    log_summary!(
        config.verbosity,
        "mapping {} tasks from {}",
        graph.len(),
        reference_date
    );

    let analysis = analyze(&graph, config);

    let dependency_matrix = build_matrix(&graph, &analysis, reference_date)?;
    let critical_path = CriticalPathSummary {
        tasks: analysis
            .critical_path
            .iter()
            .map(|&id| graph.code(id).to_string())
            .collect(),
        total_duration: analysis.project_duration,
        bottlenecks: analysis.bottlenecks.clone(),
    };
    let parallel_opportunities = build_parallel_opportunities(&graph, &analysis, reference_date)?;
    let issues_detected = analysis.issues.clone();

    let mut mapping = DependencyMapping {
        mapping_id: identity.mapping_id,
        event_id: identity.event_id,
        reference_date,
        dependency_matrix,
        critical_path,
        parallel_opportunities,
        issues_detected,
        recommendations: Vec::new(),
        created_at: identity.created_at,
    };
    mapping.recommendations = recommendations(&mapping, config);
    log_pass!(
        config.verbosity,
        "recommendations: {:?}",
        mapping.recommendations
    );

    Ok(mapping)
}

fn offset_date(
    reference_date: NaiveDate,
    code: &str,
    offset: i64,
) -> Result<NaiveDate, MappingError> {
    u64::try_from(offset)
        .ok()
        .and_then(|days| reference_date.checked_add_days(Days::new(days)))
        .ok_or_else(|| MappingError::DateOutOfRange {
            code: code.to_string(),
            offset,
        })
}

fn build_matrix(
    graph: &TaskGraph<'_>,
    analysis: &ScheduleAnalysis,
    reference_date: NaiveDate,
) -> Result<Vec<DependencyEntry>, MappingError> {
    let mut matrix = Vec::with_capacity(graph.len());

    for id in graph.ids() {
        let task = graph.task(id);
        let code = graph.code(id);

        let mut entry = DependencyEntry {
            task_code: code.to_string(),
            task_name: task.name.clone(),
            category: task.category.clone(),
            start_date: task.start_date,
            end_date: task.end_date,
            predecessors: task
                .predecessors
                .iter()
                .map(PredecessorLink::finish_to_start)
                .collect(),
            successors: graph.successor_codes(id),
            earliest_start: None,
            latest_start: None,
            earliest_finish: None,
            latest_finish: None,
            float_days: None,
            is_critical: false,
        };

        if let Some(timing) = analysis.timing(id) {
            let to_date = |offset| offset_date(reference_date, code, offset).map(Some);
            entry.earliest_start = to_date(timing.earliest_start)?;
            entry.latest_start = to_date(timing.latest_start)?;
            entry.earliest_finish = to_date(timing.earliest_finish)?;
            entry.latest_finish = to_date(timing.latest_finish)?;
            entry.float_days = Some(timing.float);
            entry.is_critical = timing.is_critical();
        }

        matrix.push(entry);
    }

    Ok(matrix)
}

fn build_parallel_opportunities(
    graph: &TaskGraph<'_>,
    analysis: &ScheduleAnalysis,
    reference_date: NaiveDate,
) -> Result<Vec<ParallelOpportunity>, MappingError> {
    analysis
        .parallel_groups
        .iter()
        .map(|group| {
            let task_group: Vec<String> = group
                .members
                .iter()
                .map(|&id| graph.code(id).to_string())
                .collect();
            let can_start_after = group
                .start_offset
                .map(|offset| offset_date(reference_date, &task_group[0], offset))
                .transpose()?;
            Ok(ParallelOpportunity {
                task_group,
                can_start_after,
                time_savings_days: group.time_savings_days,
            })
        })
        .collect()
}

fn recommendations(mapping: &DependencyMapping, config: &MappingConfig) -> Vec<String> {
    let mut out = Vec::new();

    if config.analyze_critical_path {
        out.push(format!(
            "Total project duration: {} days",
            mapping.critical_path.total_duration
        ));
        out.push(format!(
            "Critical path: {} tasks",
            mapping.critical_path.tasks.len()
        ));
    }

    if !mapping.parallel_opportunities.is_empty() {
        out.push(format!(
            "Parallel execution groups available: {}",
            mapping.parallel_opportunities.len()
        ));
    }

    if !mapping.issues_detected.is_empty() {
        out.push(format!(
            "{} dependency issues detected - review required",
            mapping.issues_detected.len()
        ));
    }

    if mapping.issues_of(IssueType::Circular).next().is_some() {
        out.push("Resolve circular dependencies before relying on this schedule".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DependencyType, Severity};

    fn make_task(code: &str, duration: i64, preds: &[&str]) -> Task {
        Task::new(
            code,
            format!("{code} work"),
            duration,
            preds.iter().map(|p| p.to_string()).collect(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference() -> NaiveDate {
        date(2025, 3, 1)
    }

    #[test]
    fn test_linear_chain() {
        let tasks = vec![
            make_task("A", 5, &[]),
            make_task("B", 3, &["A"]),
            make_task("C", 2, &["B"]),
        ];
        let mapping = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();

        assert_eq!(mapping.critical_path.total_duration, 10);
        assert_eq!(mapping.critical_path.tasks, vec!["A", "B", "C"]);

        let b = mapping.entry("B").unwrap();
        assert_eq!(b.earliest_start, Some(date(2025, 3, 6)));
        assert_eq!(b.earliest_finish, Some(date(2025, 3, 9)));
        assert_eq!(b.float_days, Some(0));
        assert!(b.is_critical);

        let c = mapping.entry("C").unwrap();
        assert_eq!(c.earliest_start, Some(date(2025, 3, 9)));
        assert_eq!(c.latest_finish, Some(date(2025, 3, 11)));
        assert!(mapping.issues_detected.is_empty());
    }

    #[test]
    fn test_diamond_with_slack() {
        let tasks = vec![
            make_task("A", 5, &[]),
            make_task("B", 3, &["A"]),
            make_task("C", 2, &["A"]),
            make_task("D", 4, &["B", "C"]),
        ];
        let mapping = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();

        assert_eq!(mapping.critical_path.total_duration, 12);
        assert_eq!(mapping.critical_path.tasks, vec!["A", "B", "D"]);
        assert!(mapping.critical_path.bottlenecks.is_empty());

        let c = mapping.entry("C").unwrap();
        assert_eq!(c.float_days, Some(1));
        assert!(!c.is_critical);
        assert_eq!(c.latest_start, Some(date(2025, 3, 7)));
        assert_eq!(c.latest_finish, Some(date(2025, 3, 9)));

        let a = mapping.entry("A").unwrap();
        assert_eq!(a.successors, vec!["B", "C"]);

        let d = mapping.entry("D").unwrap();
        assert_eq!(d.predecessors.len(), 2);
        assert_eq!(d.predecessors[0].dependency_type, DependencyType::FinishToStart);
        assert_eq!(d.predecessors[1].lag_days, 0);
        assert_eq!(d.latest_finish, Some(date(2025, 3, 13)));

        assert_eq!(mapping.parallel_opportunities.len(), 1);
        let group = &mapping.parallel_opportunities[0];
        assert_eq!(group.task_group, vec!["B", "C"]);
        assert_eq!(group.can_start_after, Some(date(2025, 3, 6)));
        assert!((group.time_savings_days - 0.5).abs() < 1e-9);

        assert_eq!(
            mapping.recommendations,
            vec![
                "Total project duration: 12 days".to_string(),
                "Critical path: 3 tasks".to_string(),
                "Parallel execution groups available: 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_orphan_detection() {
        let tasks = vec![
            make_task("A", 2, &[]),
            make_task("B", 2, &["A"]),
            make_task("LONE", 1, &[]),
        ];
        let mapping = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();

        let orphans: Vec<_> = mapping.issues_of(IssueType::Orphan).collect();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].affected_tasks, vec!["LONE"]);
        assert_eq!(orphans[0].severity, Severity::Medium);
        assert!(mapping
            .recommendations
            .contains(&"1 dependency issues detected - review required".to_string()));
    }

    #[test]
    fn test_missing_predecessor_still_scheduled() {
        let tasks = vec![
            make_task("A", 4, &[]),
            make_task("B", 2, &["A", "X-999"]),
        ];
        let mapping = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();

        let missing: Vec<_> = mapping.issues_of(IssueType::MissingPredecessor).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].affected_tasks, vec!["B"]);
        assert_eq!(missing[0].severity, Severity::High);

        assert_eq!(mapping.critical_path.total_duration, 6);
        let b = mapping.entry("B").unwrap();
        assert_eq!(b.earliest_start, Some(date(2025, 3, 5)));
        assert_eq!(b.float_days, Some(0));
        // The declared link is still echoed back
        assert_eq!(b.predecessors.len(), 2);
        assert_eq!(b.predecessors[1].task_code, "X-999");
    }

    #[test]
    fn test_bottleneck_in_mapping() {
        let tasks = vec![
            make_task("KICKOFF", 1, &[]),
            make_task("VENUE", 3, &["KICKOFF"]),
            make_task("CATERING", 3, &["KICKOFF"]),
            make_task("AV", 3, &["KICKOFF"]),
        ];
        let mapping = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();

        assert_eq!(mapping.critical_path.tasks.len(), 4);
        let bottlenecks = &mapping.critical_path.bottlenecks;
        assert_eq!(bottlenecks.len(), 1);
        assert_eq!(bottlenecks[0].task_code, "KICKOFF");
        assert_eq!(
            bottlenecks[0].reason,
            "3 tasks are waiting on this task to finish"
        );
    }

    #[test]
    fn test_circular_dependency_reported() {
        let tasks = vec![
            make_task("A", 2, &[]),
            make_task("B", 1, &["A", "C"]),
            make_task("C", 1, &["B"]),
            make_task("D", 1, &["C"]),
        ];
        let mapping = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();

        let circular: Vec<_> = mapping.issues_of(IssueType::Circular).collect();
        assert_eq!(circular.len(), 2);
        assert_eq!(circular[0].affected_tasks, vec!["B", "C"]);
        assert_eq!(circular[1].affected_tasks, vec!["D"]);

        let b = mapping.entry("B").unwrap();
        assert_eq!(b.earliest_start, None);
        assert_eq!(b.float_days, None);
        assert!(!b.is_critical);

        assert_eq!(mapping.critical_path.tasks, vec!["A"]);
        assert_eq!(
            mapping.recommendations.last().map(String::as_str),
            Some("Resolve circular dependencies before relying on this schedule")
        );
    }

    #[test]
    fn test_analysis_disabled() {
        let tasks = vec![
            make_task("A", 5, &[]),
            make_task("B", 3, &["A"]),
            make_task("C", 2, &["A"]),
        ];
        let config = MappingConfig {
            analyze_critical_path: false,
            ..Default::default()
        };
        let mapping = map_dependencies(&tasks, reference(), &config).unwrap();

        assert!(mapping
            .dependency_matrix
            .iter()
            .all(|e| e.earliest_start.is_none() && !e.is_critical));
        assert_eq!(mapping.entry("A").unwrap().successors, vec!["B", "C"]);
        assert_eq!(mapping.critical_path, CriticalPathSummary::default());
        assert_eq!(mapping.parallel_opportunities[0].can_start_after, None);
        assert_eq!(
            mapping.recommendations,
            vec!["Parallel execution groups available: 1".to_string()]
        );
    }

    #[test]
    fn test_matrix_follows_presentation_order() {
        let tasks = vec![
            make_task("C", 1, &["B"]),
            make_task("A", 1, &[]),
            make_task("B", 1, &["A"]),
        ];
        let mapping = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();
        let order: Vec<&str> = mapping
            .dependency_matrix
            .iter()
            .map(|e| e.task_code.as_str())
            .collect();

        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(mapping.entry("C").unwrap().task_name, "C work");
    }

    #[test]
    fn test_month_boundary_dates() {
        let tasks = vec![make_task("A", 3, &[]), make_task("B", 2, &["A"])];
        let mapping =
            map_dependencies(&tasks, date(2024, 2, 27), &MappingConfig::default()).unwrap();

        let b = mapping.entry("B").unwrap();
        assert_eq!(b.earliest_start, Some(date(2024, 3, 1)));
        assert_eq!(b.earliest_finish, Some(date(2024, 3, 3)));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let config = MappingConfig::default();
        assert_eq!(
            map_dependencies(&[], reference(), &config),
            Err(MappingError::EmptyTaskList)
        );

        let duplicate = vec![make_task("A", 1, &[]), make_task("A", 1, &[])];
        assert_eq!(
            map_dependencies(&duplicate, reference(), &config),
            Err(MappingError::DuplicateTaskCode("A".to_string()))
        );

        let negative = vec![make_task("A", -1, &[])];
        assert!(matches!(
            map_dependencies(&negative, reference(), &config),
            Err(MappingError::NegativeDuration { .. })
        ));
    }

    #[test]
    fn test_date_out_of_range() {
        let tasks = vec![make_task("A", 10, &[])];
        let result = map_dependencies(&tasks, NaiveDate::MAX, &MappingConfig::default());

        assert!(matches!(
            result,
            Err(MappingError::DateOutOfRange { ref code, .. }) if code == "A"
        ));
    }

    #[test]
    fn test_identity_echoed() {
        let tasks = vec![make_task("A", 2, &[])];
        let created_at = date(2025, 2, 20).and_hms_opt(9, 30, 0).unwrap();
        let identity = RequestIdentity {
            event_id: Some("EVT-42".to_string()),
            mapping_id: Some("map-1".to_string()),
            created_at: Some(created_at),
        };
        let mapping = map_dependencies_with_identity(
            &tasks,
            reference(),
            identity,
            &MappingConfig::default(),
        )
        .unwrap();

        assert_eq!(mapping.event_id.as_deref(), Some("EVT-42"));
        assert_eq!(mapping.mapping_id.as_deref(), Some("map-1"));
        assert_eq!(mapping.created_at, Some(created_at));

        let plain = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();
        assert_eq!(plain.event_id, None);
        assert_eq!(plain.mapping_id, None);
        assert_eq!(plain.created_at, None);
    }

    #[test]
    fn test_planned_dates_passed_through() {
        let mut a = make_task("A", 5, &[]);
        a.start_date = Some(date(2025, 6, 1));
        a.end_date = Some(date(2025, 6, 10));
        let tasks = vec![a, make_task("B", 3, &["A"])];
        let mapping = map_dependencies(&tasks, reference(), &MappingConfig::default()).unwrap();

        let a = mapping.entry("A").unwrap();
        assert_eq!(a.start_date, Some(date(2025, 6, 1)));
        assert_eq!(a.end_date, Some(date(2025, 6, 10)));
        // Planned dates do not move the computed schedule
        assert_eq!(a.earliest_start, Some(reference()));
        assert_eq!(mapping.entry("B").unwrap().start_date, None);
    }

    #[test]
    fn test_duration_overflow_rejected() {
        let half = i64::MAX / 2 + 1;
        let tasks = vec![make_task("A", half, &[]), make_task("B", half, &["A"])];
        let result = map_dependencies(&tasks, date(2025, 1, 1), &MappingConfig::default());

        assert_eq!(
            result.unwrap_err(),
            MappingError::DurationOverflow {
                code: "B".to_string()
            }
        );
    }
}
