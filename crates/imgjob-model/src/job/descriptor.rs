use serde::{Deserialize, Serialize};

use crate::{JobName, OutputTemplate, Partition, TasksPerNode};

/// Resource request declared to the scheduler.
///
/// Every field defaults to the value the build job is normally submitted
/// with, so an empty config section yields the stock descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct JobDescriptor {
    /// `--job-name`
    pub name: JobName,
    /// `--partition`
    pub partition: Partition,
    /// `--ntasks-per-node`
    #[serde(alias = "ntasks-per-node")]
    pub tasks_per_node: TasksPerNode,
    /// `--output`
    pub output: OutputTemplate,
}

#[cfg(test)]
mod tests {
    use super::JobDescriptor;

    #[test]
    fn default_matches_stock_request() {
        let d = JobDescriptor::default();
        assert_eq!(d.name.as_str(), "build_image");
        assert_eq!(d.partition.as_str(), "cpu-2h");
        assert_eq!(d.tasks_per_node.get(), 2);
        assert_eq!(d.output.as_str(), "logs/job-%j.out");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let d: JobDescriptor = serde_json::from_str(r#"{"partition": "cpu-8h"}"#).unwrap();
        assert_eq!(d.partition.as_str(), "cpu-8h");
        assert_eq!(d.name.as_str(), "build_image");
        assert_eq!(d.tasks_per_node.get(), 2);
    }

    #[test]
    fn kebab_case_keys() {
        let d: JobDescriptor = serde_json::from_str(r#"{"tasks-per-node": 4}"#).unwrap();
        assert_eq!(d.tasks_per_node.get(), 4);
        assert!(serde_json::from_str::<JobDescriptor>(r#"{"tasks-per-node": 0}"#).is_err());
    }

    #[test]
    fn directive_spelling_is_accepted() {
        let d: JobDescriptor = serde_json::from_str(r#"{"ntasks-per-node": 8}"#).unwrap();
        assert_eq!(d.tasks_per_node.get(), 8);
    }
}
