//! The presentation module projects station configuration onto the labels
//! shown on outgoing edges.  Labels are derived data: they are recomputed
//! whenever a station or its edge list changes and are never persisted.

use crate::stations::{Connectable, Decide, DecideMode, Process, StationBehavior};

pub const ERROR_LABEL: &str = "ERROR";
pub const ELSE_CONDITION_LABEL: &str = "else case";
pub const OTHER_CLIENT_TYPES_LABEL: &str = "all other client types";
pub const OTHER_VALUES_LABEL: &str = "all other values";
pub const SUCCESS_LABEL: &str = "Success";
pub const CANCELATION_LABEL: &str = "Waiting cancelation";

/// One label per outgoing edge of the station, in outgoing edge order.
pub fn edge_labels(station: &dyn StationBehavior) -> Vec<String> {
    if let Some(decide) = station.as_decide() {
        return decide_edge_labels(decide);
    }
    if let Some(process) = station.as_process() {
        return process_edge_labels(process);
    }
    vec![String::new(); station.edges_out().len()]
}

/// Labels of a Process station: success and cancel edges are only named
/// once both exist.
pub fn process_edge_labels(process: &Process) -> Vec<String> {
    match (process.edge_success(), process.edge_cancel()) {
        (Some(_), Some(_)) => vec![SUCCESS_LABEL.to_string(), CANCELATION_LABEL.to_string()],
        (None, Some(_)) => vec![CANCELATION_LABEL.to_string()],
        (Some(_), None) => vec![String::new()],
        (None, None) => Vec::new(),
    }
}

pub fn decide_edge_labels(decide: &Decide) -> Vec<String> {
    let edge_count = decide.edges_out().len();
    let last = edge_count.saturating_sub(1);
    (0..edge_count)
        .map(|index| {
            let label = match decide.decision() {
                DecideMode::Chance { rates } => chance_label(rates, index, edge_count),
                DecideMode::Condition { .. } if index < last => format!("Condition {}", index + 1),
                DecideMode::Condition { .. } => ELSE_CONDITION_LABEL.to_string(),
                DecideMode::ClientType { .. } if index == last => {
                    OTHER_CLIENT_TYPES_LABEL.to_string()
                }
                DecideMode::ClientType { client_types } => match client_types.get(index) {
                    Some(types) if !types.is_empty() => client_type_list(types),
                    _ => ERROR_LABEL.to_string(),
                },
                DecideMode::Sequence { multiplicities } => {
                    match multiplicities.get(index).copied().unwrap_or(1) {
                        multiplicity if multiplicity > 1 => {
                            format!("Number {} ({}x)", index + 1, multiplicity)
                        }
                        _ => format!("Number {}", index + 1),
                    }
                }
                DecideMode::KeyValue { .. } if index == last => OTHER_VALUES_LABEL.to_string(),
                DecideMode::KeyValue { key, values, .. } => match values.get(index) {
                    Some(value) => format!("{}={}", key, value),
                    None => ERROR_LABEL.to_string(),
                },
                _ => String::new(),
            };
            match decide.new_client_type(index) {
                Some(client_type) => format!("{}, New client type: {}", label, client_type),
                None => label,
            }
        })
        .collect()
}

/// Shows at most three types, marking longer lists with an ellipsis.
fn client_type_list(types: &[String]) -> String {
    let mut label = types
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join(",");
    if types.len() > 3 {
        label.push_str(",...");
    }
    label
}

/// `Rate r (p%)`.  The share is only shown when every rate is a plain
/// number.
fn chance_label(rates: &[String], index: usize, edge_count: usize) -> String {
    let rate = rates.get(index).map_or("1", String::as_str);
    let plain: Option<Vec<f64>> = (0..edge_count)
        .map(|index| {
            rates
                .get(index)
                .map_or(Some(1.0), |rate| rate.trim().parse::<f64>().ok())
        })
        .collect();
    let share = plain.map(|values| {
        let sum: f64 = values.iter().map(|value| value.max(0.0)).sum();
        let sum = if sum == 0.0 { 1.0 } else { sum };
        values[index].max(0.0) / sum
    });
    match share {
        Some(share) => format!("Rate {} ({})", rate, format_percent(share)),
        None => format!("Rate {}", rate),
    }
}

fn format_percent(share: f64) -> String {
    let percent = (share * 1000.0).round() / 10.0;
    if percent.fract() == 0.0 {
        format!("{:.0}%", percent)
    } else {
        format!("{:.1}%", percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::ResourceAlternative;

    fn decide(decision: DecideMode, edges: usize) -> Decide {
        let mut decide = Decide::new(DecideMode::ShortestQueueNextStation);
        for index in 0..edges {
            decide.add_edge_out(&format!("e{}", index));
        }
        decide.set_decision(decision);
        decide
    }

    #[test]
    fn chance_labels_show_shares_of_plain_rates() {
        let labels = decide_edge_labels(&decide(DecideMode::chance(&["1", "2", "1"]), 3));
        assert_eq!(labels, vec!["Rate 1 (25%)", "Rate 2 (50%)", "Rate 1 (25%)"]);
        let labels = decide_edge_labels(&decide(DecideMode::chance(&["1", "2"]), 3));
        assert_eq!(labels[2], "Rate 1 (25%)");
        let labels = decide_edge_labels(&decide(DecideMode::chance(&["1", "2", "x"]), 3));
        assert_eq!(labels, vec!["Rate 1", "Rate 2", "Rate x"]);
        let labels = decide_edge_labels(&decide(DecideMode::chance(&["1", "2"]), 2));
        assert_eq!(labels[0], "Rate 1 (33.3%)");
    }

    #[test]
    fn all_zero_rates_still_get_labels() {
        let labels = decide_edge_labels(&decide(DecideMode::chance(&["0", "0"]), 2));
        assert_eq!(labels, vec!["Rate 0 (0%)", "Rate 0 (0%)"]);
    }

    #[test]
    fn else_edges_are_named() {
        let labels = decide_edge_labels(&decide(DecideMode::condition(&["a>1", "b>1", ""]), 3));
        assert_eq!(labels, vec!["Condition 1", "Condition 2", "else case"]);

        let client_types = DecideMode::ClientType {
            client_types: vec![
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                vec![],
                vec![],
            ],
        };
        let labels = decide_edge_labels(&decide(client_types, 3));
        assert_eq!(labels, vec!["A,B,C,...", "ERROR", "all other client types"]);

        let key_value = DecideMode::KeyValue {
            key: "color".into(),
            values: vec!["red".into(), "blue".into()],
            multi_text_values: true,
        };
        let labels = decide_edge_labels(&decide(key_value, 2));
        assert_eq!(labels, vec!["color=red", "all other values"]);
    }

    #[test]
    fn sequence_and_metric_labels() {
        let labels = decide_edge_labels(&decide(DecideMode::sequence(&[2, 1]), 2));
        assert_eq!(labels, vec!["Number 1 (2x)", "Number 2"]);
        let labels = decide_edge_labels(&decide(DecideMode::ShortestQueueNextStation, 2));
        assert_eq!(labels, vec!["", ""]);
    }

    #[test]
    fn new_client_type_is_appended() {
        let mut station = decide(DecideMode::condition(&["x>0", ""]), 2);
        station.set_new_client_type(1, Some(" Rework "));
        let labels = decide_edge_labels(&station);
        assert_eq!(labels[1], "else case, New client type: Rework");
    }

    #[test]
    fn process_labels_need_a_cancel_edge() {
        let mut process = Process::new(vec![ResourceAlternative::new().with("G", 1)]);
        process.add_edge_out("ok");
        assert_eq!(process_edge_labels(&process), vec![""]);
        process.add_edge_out("cancel");
        assert_eq!(
            edge_labels(&process),
            vec!["Success", "Waiting cancelation"]
        );
    }
}
