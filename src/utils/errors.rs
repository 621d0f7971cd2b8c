use thiserror::Error;

use crate::expression::{EvaluationError, ExpressionEngine, ParseError};

/// `ConfigurationError` enumerates every way a station model can be
/// misconfigured.  These are detected at load or validation time, name the
/// offending station and field, and are never deferred to simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Represents an expression that the expression engine cannot parse
    #[error("Station '{station}' field '{field}' holds malformed expression '{expression}': {source}")]
    MalformedExpression {
        station: String,
        field: String,
        expression: String,
        source: ParseError,
    },

    /// Represents a numeric field outside of its legal range
    #[error("Station '{station}' field '{field}' is out of range: {value}")]
    OutOfRange {
        station: String,
        field: String,
        value: String,
    },

    /// Represents an edge whose endpoint does not exist in the graph
    #[error("Edge '{edge}' references station '{station}', which does not exist")]
    DanglingEdge { edge: String, station: String },

    /// Represents an edge that is not registered on both of its endpoints
    #[error("Edge '{edge}' is not registered on both its source and target")]
    BrokenConnection { edge: String },

    /// Represents a routing station that has nowhere to send clients
    #[error("Station '{station}' has no outgoing edges")]
    NoOutgoingEdges { station: String },

    /// Represents a required time source that resolves to nothing
    #[error("Station '{station}' has no {field} distribution")]
    MissingDistribution { station: String, field: String },

    /// Represents two options that cannot be combined on one station
    #[error("Station '{station}' combines incompatible options: {message}")]
    IncompatibleOptions { station: String, message: String },

    /// Represents a process station without any resource alternative
    #[error("Station '{station}' has no usable resource alternative")]
    NoResourceAlternative { station: String },

    /// Represents an operation requested on a station that does not exist
    #[error("Station '{0}' cannot be found in the graph")]
    StationNotFound(String),

    /// Represents an operation requested on an edge that does not exist
    #[error("Edge '{0}' cannot be found in the graph")]
    EdgeNotFound(String),

    /// Represents a duplicate station or edge identifier
    #[error("Identifier '{0}' is already in use")]
    DuplicateId(String),

    /// Represents an edge that the endpoint station cannot accept
    #[error("Station '{station}' cannot accept another {direction} edge")]
    CapacityExceeded { station: String, direction: String },

    /// Represents a station type that is not known to the station factory
    #[error("Station '{station}' has unknown type '{station_type}'")]
    UnknownStationType {
        station: String,
        station_type: String,
    },

    /// Represents a station body that cannot be decoded
    #[error("Station '{station}' cannot be decoded: {message}")]
    Deserialization { station: String, message: String },

    /// Represents a model document that cannot be decoded or encoded at all
    #[error("Model document cannot be processed: {0}")]
    Document(String),
}

/// Non-fatal findings of a validation pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationWarning {
    /// Every Chance rate evaluates to a constant that is not positive, so
    /// the station can never select an edge
    #[error("Station '{station}' has no positive Chance rate")]
    AllChanceWeightsZero { station: String },

    /// An option that has no effect in the current configuration
    #[error("Station '{station}' option '{option}' has no effect: {message}")]
    IneffectiveOption {
        station: String,
        option: String,
        message: String,
    },
}

/// Errors raised while evaluating a configuration against live simulation
/// data.  The scheduler decides how to react to them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeDataError {
    /// Represents a station metric that the runtime cannot provide
    #[error("Metric '{metric}' is unavailable for station '{station}'")]
    MetricUnavailable { station: String, metric: String },

    /// Represents a failed evaluation of a configured expression
    #[error("Station '{station}' failed to evaluate '{expression}': {source}")]
    EvaluationFailed {
        station: String,
        expression: String,
        source: EvaluationError,
    },

    /// Represents a Chance decision whose weights sum to zero
    #[error("Station '{0}' has no positive routing weight")]
    NoPositiveWeight(String),

    /// Represents a decision requested on a station without outgoing edges
    #[error("Station '{0}' has no outgoing edges")]
    NoOutgoingEdges(String),

    /// Represents a routing request for a station that is not a Decide
    /// station of the graph
    #[error("Station '{0}' is not a Decide station of the model")]
    NotADecideStation(String),

    /// Represents a process station without a configured working time
    #[error("Station '{0}' has no working time for the client type")]
    NoWorkingTime(String),

    /// Represents a failed random variate draw
    #[error("Station '{station}' failed to sample a random variate: {message}")]
    Sampling { station: String, message: String },
}

/// `SimulationError` is the umbrella error of the crate.  It wraps the
/// configuration and runtime errors, and the errors of the random variate
/// and serialization crates.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Transparent configuration errors
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Transparent runtime data errors
    #[error(transparent)]
    RuntimeData(#[from] RuntimeDataError),

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent Beta distribution errors
    #[error(transparent)]
    BetaError(#[from] rand_distr::BetaError),

    /// Transparent Exponential distribution errors
    #[error(transparent)]
    ExpError(#[from] rand_distr::ExpError),

    /// Transparent Gamma distribution errors
    #[error(transparent)]
    GammaError(#[from] rand_distr::GammaError),

    /// Transparent Normal distribution errors
    #[error(transparent)]
    NormalError(#[from] rand_distr::NormalError),

    /// Transparent Triangular distribution errors
    #[error(transparent)]
    TriangularError(#[from] rand_distr::TriangularError),

    /// Transparent Weibull distribution errors
    #[error(transparent)]
    WeibullError(#[from] rand_distr::WeibullError),

    /// Represents invalid bounds of a Uniform distribution
    #[error("Uniform distribution requires min < max, got [{min}, {max})")]
    UniformError { min: f64, max: f64 },
}

/// The outcome of a validation pass over a station graph.  Errors make the
/// model unusable, warnings do not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ConfigurationError>,
    pub warnings: Vec<ConfigurationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, error: ConfigurationError) {
        self.errors.push(error);
    }

    pub fn warning(&mut self, warning: ConfigurationWarning) {
        self.warnings.push(warning);
    }

    /// Parse-checks an expression, recording a `MalformedExpression` error
    /// naming the station and field on failure.
    pub fn check_expression(
        &mut self,
        engine: &dyn ExpressionEngine,
        station: &str,
        field: &str,
        expression: &str,
    ) {
        if let Err(source) = engine.check(expression) {
            self.error(ConfigurationError::MalformedExpression {
                station: station.to_string(),
                field: field.to_string(),
                expression: expression.to_string(),
                source,
            });
        }
    }
}
