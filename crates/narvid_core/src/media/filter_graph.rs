//! Structured ffmpeg filter-graph construction.
//!
//! Graphs are built as chains with labeled input/output pads and only
//! serialized at the last step, so construction logic is testable without
//! string-matching a rendered command line.

use crate::models::{TargetFormat, TransitionSettings, VideoSegment};

/// One filter chain: `[in0][in1]filter1,filter2[out]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    /// Input pad labels (without brackets).
    pub inputs: Vec<String>,
    /// Filter expressions applied in order.
    pub filters: Vec<String>,
    /// Output pad label (without brackets).
    pub output: String,
}

impl FilterChain {
    fn render(&self) -> String {
        let inputs: String = self.inputs.iter().map(|l| format!("[{l}]")).collect();
        format!("{}{}[{}]", inputs, self.filters.join(","), self.output)
    }
}

/// An ordered set of filter chains forming one `-filter_complex` graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chain to the graph.
    pub fn chain(&mut self, inputs: Vec<String>, filters: Vec<String>, output: String) {
        self.chains.push(FilterChain {
            inputs,
            filters,
            output,
        });
    }

    /// Number of chains in the graph.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Whether the graph has no chains.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Serialize to ffmpeg `-filter_complex` syntax.
    pub fn render(&self) -> String {
        self.chains
            .iter()
            .map(FilterChain::render)
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Builds the transition graph for a list of analyzed segments.
///
/// Each input is conformed to the target spec and labeled; adjacent video
/// streams are chained with an xfade anchored at the accumulated duration
/// of the preceding segments minus the transition duration. Audio streams
/// are concatenated separately; there is no audio crossfade.
pub struct TransitionGraphBuilder<'a> {
    segments: &'a [VideoSegment],
    target: &'a TargetFormat,
    transitions: &'a TransitionSettings,
}

/// Labels of the graph's mapped output pads.
pub const VIDEO_OUT: &str = "outv";
pub const AUDIO_OUT: &str = "outa";

impl<'a> TransitionGraphBuilder<'a> {
    /// Create a builder. Segments must be analyzed and at least two.
    pub fn new(
        segments: &'a [VideoSegment],
        target: &'a TargetFormat,
        transitions: &'a TransitionSettings,
    ) -> Self {
        debug_assert!(segments.len() >= 2);
        debug_assert!(segments.iter().all(VideoSegment::is_analyzed));
        Self {
            segments,
            target,
            transitions,
        }
    }

    /// Build the full graph with `outv`/`outa` output pads.
    pub fn build(&self) -> FilterGraph {
        let mut graph = FilterGraph::new();

        // Conform every input to the target spec under a scratch label.
        for (i, _) in self.segments.iter().enumerate() {
            graph.chain(
                vec![format!("{i}:v")],
                vec![self.target.conform_filter()],
                format!("v{i}"),
            );
        }

        self.chain_transitions(&mut graph);
        self.concat_audio(&mut graph);

        graph
    }

    /// Chain xfades across the conformed video streams.
    ///
    /// Each blend consumes `duration` seconds of overlap, so the running
    /// offset advances by the next segment's length minus the transition
    /// duration.
    fn chain_transitions(&self, graph: &mut FilterGraph) {
        // Cut never reaches this path; the engine routes it to stream copy.
        let xfade = self
            .transitions
            .transition_type
            .xfade_name()
            .unwrap_or("fade");
        let fade = self.transitions.duration;

        let mut current = "v0".to_string();
        let mut accumulated = self.segments[0].duration.unwrap_or(0.0);

        for (i, segment) in self.segments.iter().enumerate().skip(1) {
            let offset = (accumulated - fade).max(0.0);
            let output = if i == self.segments.len() - 1 {
                VIDEO_OUT.to_string()
            } else {
                format!("x{i}")
            };

            graph.chain(
                vec![current.clone(), format!("v{i}")],
                vec![format!(
                    "xfade=transition={xfade}:duration={fade:.3}:offset={offset:.3}"
                )],
                output.clone(),
            );

            accumulated += segment.duration.unwrap_or(0.0) - fade;
            current = output;
        }
    }

    /// Concatenate all audio streams into one pad.
    fn concat_audio(&self, graph: &mut FilterGraph) {
        let inputs: Vec<String> = (0..self.segments.len())
            .map(|i| format!("{i}:a"))
            .collect();
        graph.chain(
            inputs,
            vec![format!("concat=n={}:v=0:a=1", self.segments.len())],
            AUDIO_OUT.to_string(),
        );
    }
}
