//! Groups a chronological chunk stream into continuous playback segments.
//!
//! Each peer has a cursor pointing at its most recent segment. A chunk
//! continues that segment when it starts exactly where the segment ends, comes
//! from the same peer and file, and arrives soon enough after the segment's
//! expected playback end. Anything else opens a new segment.

use std::collections::{HashMap, HashSet};

use swarm_core::{Chunk, ChunkRecord, FileTable, Result, Segment};

use crate::settings::InterpreterSettings;

#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    settings: InterpreterSettings,
}

impl Interpreter {
    pub fn new(settings: InterpreterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &InterpreterSettings {
        &self.settings
    }

    /// Group `chunks` into segments, in input order.
    ///
    /// Every chunk is stamped with the id of the segment it ends up in.
    /// Without `files`, or for a file missing from `files`, durations that
    /// need the file's byte rate are left unset. A malformed chunk fails the
    /// whole call before any chunk is stamped.
    pub fn interpret(&self, chunks: &mut [Chunk], files: Option<&FileTable>) -> Result<Vec<Segment>> {
        self.settings.validate()?;
        for chunk in chunks.iter() {
            chunk.validate()?;
        }

        let mut run = Run::new(&self.settings, files);
        for chunk in chunks.iter_mut() {
            run.feed(chunk);
        }

        tracing::debug!(
            chunks = chunks.len(),
            segments = run.segments.len(),
            "interpreted chunk stream"
        );
        Ok(run.segments)
    }

    /// Validate raw records and interpret them, returning the stamped chunks
    /// alongside the segments.
    pub fn interpret_records(
        &self,
        records: impl IntoIterator<Item = ChunkRecord>,
        files: Option<&FileTable>,
    ) -> Result<(Vec<Chunk>, Vec<Segment>)> {
        let mut chunks = records
            .into_iter()
            .map(Chunk::try_from)
            .collect::<Result<Vec<_>>>()?;
        let segments = self.interpret(&mut chunks, files)?;
        Ok((chunks, segments))
    }
}

/// State of one interpretation pass.
struct Run<'a> {
    settings: &'a InterpreterSettings,
    files: Option<&'a FileTable>,
    segments: Vec<Segment>,
    /// Peer address to the index of that peer's current segment.
    cursors: HashMap<String, usize>,
    undescribed_files: HashSet<u32>,
}

impl<'a> Run<'a> {
    fn new(settings: &'a InterpreterSettings, files: Option<&'a FileTable>) -> Self {
        Self {
            settings,
            files,
            segments: Vec::new(),
            cursors: HashMap::new(),
            undescribed_files: HashSet::new(),
        }
    }

    fn feed(&mut self, chunk: &mut Chunk) {
        let cursor = self.cursors.get(&chunk.peeraddr).copied();
        let index = match cursor {
            Some(index) if self.appendable(chunk, &self.segments[index]) => {
                self.append(chunk, index);
                index
            }
            _ => self.open(chunk),
        };
        chunk.segment_id = Some(self.segments[index].id);
    }

    fn appendable(&self, chunk: &Chunk, segment: &Segment) -> bool {
        if chunk.begin != segment.end
            || chunk.peeraddr != segment.peeraddr
            || chunk.filenum != segment.filenum
        {
            return false;
        }
        if chunk.t - segment.playback_end() >= self.settings.max_pause_within_segment {
            return false;
        }
        match (self.settings.max_segment_duration, self.appended_duration(chunk, segment)) {
            (Some(max), Some(duration)) => duration <= max,
            _ => true,
        }
    }

    /// Duration `segment` would have after absorbing `chunk`.
    fn appended_duration(&self, chunk: &Chunk, segment: &Segment) -> Option<f64> {
        let elapsed = chunk.t - segment.onset;
        if elapsed == 0.0 {
            // Chunks logged with identical timestamps: fall back to the byte rate.
            self.unadjusted_duration(segment.filenum, chunk.end.saturating_sub(segment.begin))
        } else {
            Some(elapsed)
        }
    }

    fn append(&mut self, chunk: &Chunk, index: usize) {
        let duration = self.appended_duration(chunk, &self.segments[index]);
        let segment = &mut self.segments[index];
        segment.end = chunk.end;
        segment.duration = duration;
        tracing::trace!(chunk = %chunk.id, segment = %segment.id, "appended chunk");
    }

    fn open(&mut self, chunk: &Chunk) -> usize {
        let duration = self.unadjusted_duration(chunk.filenum, chunk.size());
        if duration.is_none() && self.files.is_some() && self.undescribed_files.insert(chunk.filenum) {
            tracing::warn!(
                filenum = chunk.filenum,
                "no usable metadata for file; leaving durations unset"
            );
        }
        let index = self.segments.len();
        self.segments.push(Segment::seeded_from(chunk, duration));
        self.cursors.insert(chunk.peeraddr.clone(), index);
        tracing::trace!(chunk = %chunk.id, peer = %chunk.peeraddr, "opened segment");
        index
    }

    /// Playback time of `size` bytes at the file's nominal byte rate.
    fn unadjusted_duration(&self, filenum: u32, size: u64) -> Option<f64> {
        self.files?
            .get(filenum)
            .and_then(|info| info.unadjusted_duration(size))
    }
}
