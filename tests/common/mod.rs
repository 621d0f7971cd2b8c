use simflow::input_modeling::TimeSource;
use simflow::simulator::StationGraph;
use simflow::stations::{Decide, DecideMode, Dispose, Process, ResourceAlternative, Source, Station};
use tracing_subscriber::{fmt, EnvFilter};

/// Routes crate logs to the test writer, so they show up for failing tests.
pub fn init_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("simflow=debug"))
        .with_test_writer()
        .try_init();
}

pub fn process(groups: &[(&str, u32)]) -> Process {
    let alternative = groups
        .iter()
        .fold(ResourceAlternative::new(), |alternative, (group, count)| {
            alternative.with(group, *count)
        });
    Process::new(vec![alternative])
}

/// A source feeding a Decide station with one Dispose station per outgoing
/// edge.  The decision is installed after the edges exist.
pub fn decide_graph(decision: DecideMode, exits: usize) -> StationGraph {
    let mut graph = StationGraph::default();
    graph
        .add_station(Station::new(
            "arrivals",
            Source::new("Clients", TimeSource::Expression("60".into())),
        ))
        .unwrap();
    graph
        .add_station(Station::new(
            "decide",
            Decide::new(DecideMode::ShortestQueueNextStation),
        ))
        .unwrap();
    graph.connect("arrivals", "decide").unwrap();
    for index in 0..exits {
        let exit = format!("exit-{}", index);
        graph.add_station(Station::new(&exit, Dispose::new())).unwrap();
        graph.connect("decide", &exit).unwrap();
    }
    graph
        .configure("decide", |station| {
            if let Some(decide) = station.as_decide_mut() {
                decide.set_decision(decision);
            }
        })
        .unwrap();
    graph
}
