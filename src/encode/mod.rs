/// `ffmpeg`-based sink (MJPEG/AVI output via system `ffmpeg`).
pub(crate) mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub(crate) mod sink;
