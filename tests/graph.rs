mod common;

use simflow::expression::Calculator;
use simflow::persistence;
use simflow::simulator::StationGraph;
use simflow::stations::{
    Connectable, Decide, DecideMode, Delay, Dispose, Process, Station, TieBreak,
};
use simflow::utils::errors::ConfigurationError;

fn service_line() -> StationGraph {
    let mut graph = common::decide_graph(DecideMode::ShortestQueueNextStation, 0);
    graph
        .add_station(Station::new("desk", common::process(&[("Clerks", 1)])))
        .unwrap();
    graph.add_station(Station::new("exit", Dispose::new())).unwrap();
    graph.add_station(Station::new("lost", Dispose::new())).unwrap();
    graph.connect("decide", "desk").unwrap();
    graph.connect("decide", "exit").unwrap();
    graph.connect("desk", "exit").unwrap();
    graph
        .configure("decide", |station| {
            if let Some(decide) = station.as_decide_mut() {
                decide.set_decision(DecideMode::ClientType {
                    client_types: vec![vec!["Gold".into()], vec![]],
                });
            }
        })
        .unwrap();
    graph
}

#[test]
fn every_edge_of_an_edited_model_is_connected() {
    common::init_logging();
    let graph = service_line();
    for edge in graph.edges() {
        assert!(graph.connection_ok(edge.id()), "{}", edge.id());
    }
    let report = graph.validate(&Calculator);
    assert!(report.is_valid(), "{:?}", report.errors);
}

#[test]
fn split_edge_inserts_a_station() {
    let mut graph = service_line();
    let edge_id = graph
        .edges()
        .iter()
        .find(|edge| edge.source_id() == "decide" && edge.target_id() == "desk")
        .map(|edge| edge.id().to_string())
        .unwrap();
    let new_edge = graph
        .split_edge(&edge_id, Station::new("walk", Delay::default()))
        .unwrap();
    assert!(graph.connection_ok(&edge_id));
    assert!(graph.connection_ok(&new_edge));
    assert_eq!(graph.edge(&edge_id).unwrap().target_id(), "walk");
    assert_eq!(graph.edge(&new_edge).unwrap().target_id(), "desk");
    assert_eq!(graph.edge(&edge_id).unwrap().label(), "Gold");

    let decide = graph.station("decide").unwrap().behavior();
    assert_eq!(decide.edges_out()[0], edge_id);
    assert!(graph.validate(&Calculator).is_valid());
}

#[test]
fn split_edge_checks_before_it_mutates() {
    let mut graph = service_line();
    let before = persistence::to_json(&graph).unwrap();
    let edge_id = graph.edges()[1].id().to_string();
    let mut busy = Delay::default();
    busy.add_edge_out("elsewhere");
    assert!(matches!(
        graph.split_edge(&edge_id, Station::new("walk", busy)),
        Err(ConfigurationError::CapacityExceeded { .. })
    ));
    assert_eq!(persistence::to_json(&graph).unwrap(), before);
}

#[test]
fn cancel_edge_gets_labels_on_both_process_edges() {
    let mut graph = service_line();
    graph.connect("desk", "lost").unwrap();
    let labels: Vec<&str> = graph
        .edges()
        .iter()
        .filter(|edge| edge.source_id() == "desk")
        .map(|edge| edge.label())
        .collect();
    assert_eq!(labels, vec!["Success", "Waiting cancelation"]);

    let report = graph.validate(&Calculator);
    assert!(report.errors.contains(&ConfigurationError::IncompatibleOptions {
        station: "desk".into(),
        message: "a cancel edge needs a waiting tolerance".into()
    }));
}

#[test]
fn removing_an_edge_realigns_decide_parameters() {
    let mut graph = service_line();
    let first = graph.edges()[1].id().to_string();
    graph.remove_edge(&first).unwrap();
    let decide = graph
        .station("decide")
        .and_then(|station| station.behavior().as_decide())
        .unwrap();
    assert_eq!(
        decide.decision(),
        &DecideMode::ClientType {
            client_types: vec![vec![]]
        }
    );
    let remaining = graph
        .edges()
        .iter()
        .find(|edge| edge.source_id() == "decide")
        .unwrap();
    assert_eq!(remaining.label(), "all other client types");
}

#[test]
fn renaming_a_client_type_updates_every_station() {
    let mut graph = service_line();
    graph
        .configure("desk", |station| {
            if let Some(process) = station.as_process_mut() {
                process.set_client_priority("Gold", "w*2");
            }
        })
        .unwrap();
    graph.rename_client_type("Gold", "Platinum");
    let decide: &Decide = graph
        .station("decide")
        .and_then(|station| station.behavior().as_decide())
        .unwrap();
    assert_eq!(
        decide.decision(),
        &DecideMode::ClientType {
            client_types: vec![vec!["Platinum".into()], vec![]]
        }
    );
    let process: &Process = graph
        .station("desk")
        .and_then(|station| station.behavior().as_process())
        .unwrap();
    assert_eq!(process.client_priority("Platinum"), "w*2");
    assert_eq!(graph.edges()[1].label(), "Platinum");
}

#[test]
fn edited_model_survives_a_round_trip() {
    let graph = service_line();
    let yaml = persistence::to_yaml(&graph).unwrap();
    let reloaded = persistence::from_yaml(&yaml).unwrap();
    assert_eq!(
        persistence::to_json(&graph).unwrap(),
        persistence::to_json(&reloaded).unwrap()
    );
    let labels = |graph: &StationGraph| -> Vec<String> {
        graph.edges().iter().map(|edge| edge.label().to_string()).collect()
    };
    assert_eq!(labels(&graph), labels(&reloaded));
}

#[test]
fn removing_the_success_edge_takes_the_cancel_edge_along() {
    common::init_logging();
    let mut graph = service_line();
    let cancel = graph.connect("desk", "lost").unwrap();
    let success = graph
        .edges()
        .iter()
        .find(|edge| edge.source_id() == "desk" && edge.target_id() == "exit")
        .map(|edge| edge.id().to_string())
        .unwrap();
    graph.remove_edge(&success).unwrap();

    assert!(graph.edge(&cancel).is_none());
    let desk = graph.station("desk").unwrap().behavior();
    assert!(desk.edges_out().is_empty());
    assert!(graph.station("lost").unwrap().behavior().edges_in().is_empty());
    let report = graph.validate(&Calculator);
    assert!(!report
        .errors
        .iter()
        .any(|error| matches!(error, ConfigurationError::BrokenConnection { .. })));
    assert!(report
        .errors
        .contains(&ConfigurationError::NoOutgoingEdges { station: "desk".into() }));

    graph.remove_station("desk").unwrap();
    for edge in graph.edges() {
        assert!(graph.connection_ok(edge.id()), "{}", edge.id());
    }
}

#[test]
fn removing_a_process_station_with_both_exits() {
    let mut graph = service_line();
    graph.connect("desk", "lost").unwrap();
    graph.remove_station("desk").unwrap();
    assert!(graph.station("desk").is_none());
    assert!(graph
        .edges()
        .iter()
        .all(|edge| edge.source_id() != "desk" && edge.target_id() != "desk"));
    assert!(graph.station("lost").unwrap().behavior().edges_in().is_empty());
}

#[test]
fn every_decide_mode_survives_a_round_trip() {
    let modes = vec![
        DecideMode::chance(&["2", "x*3", "0.5"]),
        DecideMode::condition(&["x > 1", "y == 2", ""]),
        DecideMode::ClientType {
            client_types: vec![vec!["Gold".into(), "Silver".into()], vec!["Bronze".into()], vec![]],
        },
        DecideMode::sequence(&[3, 1, 2]),
        DecideMode::KeyValue {
            key: "region".into(),
            values: vec!["north;east".into(), "south".into(), String::new()],
            multi_text_values: false,
        },
        DecideMode::ShortestQueueProcessStation,
        DecideMode::MaxClientsNextStation,
    ];
    for mode in modes {
        let mut graph = common::decide_graph(mode.clone(), 3);
        graph
            .configure("decide", |station| {
                if let Some(decide) = station.as_decide_mut() {
                    decide.set_tie_break(TieBreak::Random);
                    decide.set_new_client_type(0, Some("Express"));
                    decide.set_new_client_type(2, Some("Returned"));
                }
            })
            .unwrap();
        let original: Decide = graph
            .station("decide")
            .and_then(|station| station.behavior().as_decide())
            .cloned()
            .unwrap();
        assert_eq!(original.decision(), &mode);

        let from_yaml = persistence::from_yaml(&persistence::to_yaml(&graph).unwrap()).unwrap();
        let from_json = persistence::from_json(&persistence::to_json(&graph).unwrap()).unwrap();
        for reloaded in [from_yaml, from_json].iter() {
            let decide = reloaded
                .station("decide")
                .and_then(|station| station.behavior().as_decide())
                .unwrap();
            assert_eq!(&original, decide, "{:?}", mode);
            assert_eq!(graph.edges(), reloaded.edges(), "{:?}", mode);
        }
    }
}
