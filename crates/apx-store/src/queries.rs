//! SQL against the orchestrator's metadata schema.
//!
//! A DAG counts as active when it is neither deactivated nor paused. DAGs missing from the
//! `dag` table are reported inactive with no owners.

pub(crate) const TASK_INSTANCES: &str = r#"
SELECT ti.dag_id,
       ti.task_id,
       ti.run_id,
       ti.state,
       dr.execution_date,
       ti.start_date,
       ti.end_date,
       ti.duration,
       COALESCE(d.owners, '') AS owners,
       COALESCE(d.is_active AND NOT d.is_paused, FALSE) AS dag_active
FROM task_instance ti
JOIN dag_run dr ON dr.dag_id = ti.dag_id AND dr.run_id = ti.run_id
LEFT JOIN dag d ON d.dag_id = ti.dag_id
ORDER BY ti.dag_id, ti.task_id, dr.execution_date
"#;

pub(crate) const DAG_RUNS: &str = r#"
SELECT dr.dag_id,
       dr.run_id,
       dr.state,
       dr.execution_date,
       dr.start_date,
       dr.end_date,
       COALESCE(d.owners, '') AS owners,
       COALESCE(d.is_active AND NOT d.is_paused, FALSE) AS dag_active
FROM dag_run dr
LEFT JOIN dag d ON d.dag_id = dr.dag_id
ORDER BY dr.dag_id, dr.execution_date
"#;

pub(crate) const TASK_FAILURES: &str = r#"
SELECT tf.dag_id,
       tf.task_id,
       COUNT(*) AS failures,
       COALESCE(d.is_active AND NOT d.is_paused, FALSE) AS dag_active
FROM task_fail tf
LEFT JOIN dag d ON d.dag_id = tf.dag_id
GROUP BY tf.dag_id, tf.task_id, d.is_active, d.is_paused
ORDER BY tf.dag_id, tf.task_id
"#;

pub(crate) const SIDE_CHANNEL: &str = r#"
WITH latest AS (
    SELECT DISTINCT ON (dag_id) dag_id, run_id
    FROM dag_run
    ORDER BY dag_id, execution_date DESC
)
SELECT x.dag_id,
       x.task_id,
       x.key,
       x.value
FROM xcom x
JOIN latest l ON l.dag_id = x.dag_id AND l.run_id = x.run_id
ORDER BY x.dag_id, x.task_id, x.key
"#;

/// `$1`: canary DAG id.
pub(crate) const SCHEDULER_TIMINGS: &str = r#"
SELECT dr.dag_id,
       dr.run_id,
       NULL::TEXT AS task_id,
       NULL::TEXT AS queue,
       dr.execution_date AS logical_date,
       dr.execution_date AS scheduled_at,
       dr.start_date AS started_at
FROM dag_run dr
WHERE dr.dag_id = $1
UNION ALL
SELECT ti.dag_id,
       ti.run_id,
       ti.task_id,
       ti.queue,
       dr.execution_date AS logical_date,
       ti.queued_dttm AS scheduled_at,
       ti.start_date AS started_at
FROM task_instance ti
JOIN dag_run dr ON dr.dag_id = ti.dag_id AND dr.run_id = ti.run_id
WHERE ti.dag_id = $1
  AND ti.queued_dttm IS NOT NULL
ORDER BY logical_date
"#;

#[cfg(test)]
mod tests {
    use super::*;

    /// Output column names of every top-level `SELECT` branch, in order.
    fn selected_columns(sql: &str) -> Vec<Vec<&str>> {
        sql.split("\nSELECT ")
            .skip(1)
            .map(|branch| {
                let list = branch.split("\nFROM").next().unwrap_or_default();
                list.split(",\n")
                    .map(|item| {
                        let item = item.trim();
                        match item.rsplit_once(" AS ") {
                            Some((_, alias)) => alias.trim(),
                            None => item.rsplit_once('.').map_or(item, |(_, col)| col),
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn task_instances_match_row_fields() {
        assert_eq!(
            selected_columns(TASK_INSTANCES),
            vec![vec![
                "dag_id",
                "task_id",
                "run_id",
                "state",
                "execution_date",
                "start_date",
                "end_date",
                "duration",
                "owners",
                "dag_active",
            ]]
        );
    }

    #[test]
    fn dag_runs_match_row_fields() {
        assert_eq!(
            selected_columns(DAG_RUNS),
            vec![vec![
                "dag_id",
                "run_id",
                "state",
                "execution_date",
                "start_date",
                "end_date",
                "owners",
                "dag_active",
            ]]
        );
    }

    #[test]
    fn task_failures_match_row_fields() {
        assert_eq!(
            selected_columns(TASK_FAILURES),
            vec![vec!["dag_id", "task_id", "failures", "dag_active"]]
        );
    }

    #[test]
    fn side_channel_ignores_cte_columns() {
        assert_eq!(
            selected_columns(SIDE_CHANNEL),
            vec![vec!["dag_id", "task_id", "key", "value"]]
        );
    }

    #[test]
    fn scheduler_timing_branches_share_row_fields() {
        let fields = vec![
            "dag_id",
            "run_id",
            "task_id",
            "queue",
            "logical_date",
            "scheduled_at",
            "started_at",
        ];
        assert_eq!(selected_columns(SCHEDULER_TIMINGS), vec![fields.clone(), fields]);
    }
}
