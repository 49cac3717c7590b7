mod parallel_offset;

pub use parallel_offset::{
    detect_orientation, OffsetFrame, Orientation, ParallelOffset2D, Topology, CLOSURE_TOLERANCE,
    MIN_SEGMENT_LENGTH, PARALLEL_THRESHOLD, TURN_NOISE_ANGLE,
};
