mod common;

use std::collections::BTreeMap;

use simflow::expression::Calculator;
use simflow::persistence;
use simflow::simulator::{Client, Services};
use simflow::stations::{Connectable, GreedyBatchPolicy, Process, ProcessTimeType, ServiceOutcome};

const WORKSHOP: &str = r#"
stations:
  - id: arrivals
    type: Source
    edgeOut: e1
    clientType: Bolts
    interarrivalTime:
      distribution:
        exp:
          lambda: 0.01
  - id: lathe
    type: Process
    edgesIn: [e1]
    edgeSuccess: e2
    edgeCancel: e3
    timeBase: minutes
    processTimeType: transfer
    campaignMode: true
    working:
      general:
        distribution:
          constant:
            value: 4
      byClientType:
        Nuts:
          expression: "size * 2"
    cancel:
      general:
        expression: "30"
    setupTimes:
      Bolts:
        Nuts:
          expression: "3"
      Nuts:
        Bolts:
          distribution:
            constant:
              value: 1
    priority:
      Nuts: "w + 100"
    resources:
      - Operators: 2
      - Operators: 1
        Apprentices: 1
    resourceCheckInRandomOrder: true
    resourcePriority: "2"
    costs:
      perClient: "5"
      perServiceSecond: "0.1"
  - id: done
    type: Dispose
    edgesIn: [e2]
  - id: scrap
    type: Dispose
    edgesIn: [e3]
edges:
  - id: e1
    sourceID: arrivals
    targetID: lathe
  - id: e2
    sourceID: lathe
    targetID: done
  - id: e3
    sourceID: lathe
    targetID: scrap
"#;

fn lathe(graph: &simflow::simulator::StationGraph) -> &Process {
    graph
        .station("lathe")
        .and_then(|station| station.behavior().as_process())
        .unwrap()
}

#[test]
fn workshop_model_is_valid() {
    common::init_logging();
    let graph = persistence::from_yaml(WORKSHOP).unwrap();
    let report = graph.validate(&Calculator);
    assert!(report.is_valid(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    let labels: Vec<&str> = graph.edges().iter().map(|edge| edge.label()).collect();
    assert_eq!(labels, vec!["", "Success", "Waiting cancelation"]);
}

#[test]
fn timings_resolve_per_client_type_in_the_time_base() {
    let graph = persistence::from_yaml(WORKSHOP).unwrap();
    let process = lathe(&graph);
    let services = Services::default();
    let bolt = Client::new("Bolts");
    let nut = Client::new("nuts").with_attribute("size", 1.5);
    assert_eq!(process.service_time("lathe", &bolt, &services, &Calculator), Ok(240.0));
    assert_eq!(process.service_time("lathe", &nut, &services, &Calculator), Ok(180.0));
    assert_eq!(
        process.waiting_tolerance("lathe", &bolt, &services, &Calculator),
        Ok(Some(1800.0))
    );
    assert_eq!(
        process.setup_time("lathe", Some("Bolts"), &nut, &services, &Calculator),
        Ok(180.0)
    );
    assert_eq!(
        process.setup_time("lathe", Some("Nuts"), &bolt, &services, &Calculator),
        Ok(60.0)
    );
    assert_eq!(
        process.setup_time("lathe", Some("Bolts"), &bolt, &services, &Calculator),
        Ok(0.0)
    );
    assert_eq!(process.outgoing_edge(ServiceOutcome::Cancelled), Some("e3"));
    assert_eq!(process.resource_priority(), "2");
}

#[test]
fn busy_time_is_booked_as_transfer() {
    let graph = persistence::from_yaml(WORKSHOP).unwrap();
    let shares = lathe(&graph).process_time_type().account(10.0, 240.0);
    assert_eq!(lathe(&graph).process_time_type(), ProcessTimeType::Transfer);
    assert_eq!((shares.waiting, shares.transfer, shares.process), (10.0, 240.0, 0.0));
}

#[test]
fn campaign_prefers_the_running_type_over_priority() {
    let graph = persistence::from_yaml(WORKSHOP).unwrap();
    let process = lathe(&graph);
    let services = Services::default();
    let queue = vec![
        Client::new("Nuts").with_waiting_time(1.0),
        Client::new("Bolts").with_waiting_time(8.0),
        Client::new("Bolts").with_waiting_time(9.0),
    ];
    let next = |previous| {
        process
            .select_next_client("lathe", &queue, previous, &services, &Calculator)
            .unwrap()
    };
    assert_eq!(next(Some("Bolts")), Some(2));
    assert_eq!(next(Some("Nuts")), Some(0));
    assert_eq!(next(None), Some(0));
}

#[test]
fn random_order_uses_every_usable_alternative() {
    let graph = persistence::from_yaml(WORKSHOP).unwrap();
    let process = lathe(&graph);
    let services = Services::default();
    let mut free: BTreeMap<String, usize> = BTreeMap::new();
    free.insert("Operators".to_string(), 2);
    free.insert("Apprentices".to_string(), 1);
    let mut picked = [0usize; 2];
    for _ in 0..200 {
        picked[process.select_resource_alternative(&free, &services).unwrap()] += 1;
    }
    assert!(picked[0] > 50 && picked[1] > 50, "{:?}", picked);

    free.insert("Operators".to_string(), 1);
    assert!((0..20).all(|_| process.select_resource_alternative(&free, &services) == Some(1)));
    free.insert("Apprentices".to_string(), 0);
    assert_eq!(process.select_resource_alternative(&free, &services), None);
}

#[test]
fn costs_and_batches() {
    let graph = persistence::from_yaml(WORKSHOP).unwrap();
    let process = lathe(&graph);
    let costs = process
        .costs("lathe", 240.0, 60.0, &Client::new("Bolts"), &Services::default(), &Calculator)
        .unwrap();
    assert!((costs - 29.0).abs() < 1e-9);
    assert_eq!(process.form_batch(3, &GreedyBatchPolicy), Some(1));
    assert_eq!(process.form_batch(0, &GreedyBatchPolicy), None);
}

#[test]
fn source_keeps_its_single_edge() {
    let graph = persistence::from_yaml(WORKSHOP).unwrap();
    let source = graph.station("arrivals").unwrap();
    assert_eq!(source.get_type(), "Source");
    assert!(source.behavior().edges_in().is_empty());
    assert_eq!(source.behavior().edges_out(), vec!["e1"]);
    assert!(!source.behavior().can_add_edge_out());
}

#[test]
fn workshop_survives_a_round_trip() {
    let graph = persistence::from_yaml(WORKSHOP).unwrap();
    let original = lathe(&graph).clone();
    let from_yaml = persistence::from_yaml(&persistence::to_yaml(&graph).unwrap()).unwrap();
    assert_eq!(&original, lathe(&from_yaml));
    let from_json = persistence::from_json(&persistence::to_json(&graph).unwrap()).unwrap();
    assert_eq!(&original, lathe(&from_json));
    assert_eq!(graph.edges(), from_json.edges());
    assert_eq!(
        graph.station("arrivals").unwrap().behavior().edges_out(),
        from_yaml.station("arrivals").unwrap().behavior().edges_out()
    );
}

#[test]
fn renaming_a_client_type_reaches_the_setup_matrix() {
    let mut graph = persistence::from_yaml(WORKSHOP).unwrap();
    graph.rename_client_type("nuts", "Washers");
    let process = lathe(&graph);
    let pairs: Vec<(&str, &str)> = process
        .setup_times()
        .iter()
        .map(|(previous, next, _)| (previous, next))
        .collect();
    assert_eq!(pairs, vec![("Bolts", "Washers"), ("Washers", "Bolts")]);
    assert_eq!(process.client_priority("Washers"), "w + 100");
    assert!(process.working().by_client_type().contains_key("Washers"));
}
