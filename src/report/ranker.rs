//! Severity ordering for project display

use crate::report::aggregate::ProjectEntry;

/// Sort project entries by severity: Critical first, then At Risk, then
/// On Track, with Unknown last. Stable: entries with equal severity keep
/// their relative input order. Ranking happens at display time; the
/// aggregator itself preserves row insertion order.
pub fn rank_by_severity(projects: &[ProjectEntry]) -> Vec<ProjectEntry> {
    let mut ranked = projects.to_vec();
    ranked.sort_by_key(|p| p.status.rank());
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::status::ProjectStatus;

    fn entry(name: &str, status: ProjectStatus) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            status,
            description: String::new(),
        }
    }

    #[test]
    fn test_severity_order() {
        let input = vec![
            entry("a", ProjectStatus::OnTrack),
            entry("b", ProjectStatus::Unknown),
            entry("c", ProjectStatus::Critical),
            entry("d", ProjectStatus::AtRisk),
        ];
        let ranked = rank_by_severity(&input);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_stable_for_equal_severity() {
        let input = vec![
            entry("first", ProjectStatus::AtRisk),
            entry("second", ProjectStatus::AtRisk),
            entry("third", ProjectStatus::Critical),
            entry("fourth", ProjectStatus::AtRisk),
        ];
        let ranked = rank_by_severity(&input);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["third", "first", "second", "fourth"]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            entry("a", ProjectStatus::Unknown),
            entry("b", ProjectStatus::Critical),
            entry("c", ProjectStatus::OnTrack),
        ];
        let once = rank_by_severity(&input);
        let twice = rank_by_severity(&once);
        let once_names: Vec<&str> = once.iter().map(|p| p.name.as_str()).collect();
        let twice_names: Vec<&str> = twice.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(once_names, twice_names);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_by_severity(&[]).is_empty());
    }
}
