// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background loading of the two image planes.
//!
//! Each plane decodes on its own thread. Completions arrive in any order
//! and are joined by `PlaneJoin`, which settles exactly once per upload:
//! ready when both planes decoded, failed as soon as either did not.
//! Every upload bumps a generation counter and completions tagged with an
//! older generation are dropped, so a slow load can never overwrite a
//! newer upload.

use crate::models::images::{ImagePair, Plane};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Outcome of feeding one completion into the join.
#[derive(Debug)]
pub enum JoinEvent {
    /// Waiting for the other plane.
    Pending,
    Ready(ImagePair),
    Failed(String),
    /// From a superseded upload, or after this upload already settled.
    Stale,
}

/// Two-flag barrier over the background and subject decodes.
#[derive(Debug, Default)]
pub struct PlaneJoin {
    generation: u64,
    background: Option<RgbaImage>,
    subject: Option<RgbaImage>,
    settled: bool,
}

impl PlaneJoin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new upload, discarding anything collected for the previous one.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.background = None;
        self.subject = None;
        self.settled = false;
        self.generation
    }

    pub fn complete(
        &mut self,
        generation: u64,
        plane: Plane,
        result: Result<RgbaImage, String>,
    ) -> JoinEvent {
        if generation != self.generation || self.settled {
            return JoinEvent::Stale;
        }

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                self.settled = true;
                self.background = None;
                self.subject = None;
                return JoinEvent::Failed(format!("{:?} plane: {}", plane, e));
            }
        };

        match plane {
            Plane::Background => self.background = Some(image),
            Plane::Subject => self.subject = Some(image),
        }

        if self.background.is_some() && self.subject.is_some() {
            self.settled = true;
            match (self.background.take(), self.subject.take()) {
                (Some(background), Some(subject)) => JoinEvent::Ready(ImagePair::new(background, subject)),
                _ => JoinEvent::Pending,
            }
        } else {
            JoinEvent::Pending
        }
    }
}

/// A plane decode finished on a worker thread.
struct Completion {
    generation: u64,
    plane: Plane,
    result: Result<RgbaImage, String>,
}

/// Spawns plane decodes and joins their completions.
pub struct PairLoader {
    join: PlaneJoin,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl Default for PairLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PairLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            join: PlaneJoin::new(),
            sender,
            receiver,
        }
    }

    /// Start decoding both planes; supersedes any load still in flight.
    pub fn start(&mut self, background: PathBuf, subject: PathBuf) -> u64 {
        let generation = self.join.begin();
        log::info!(
            "Loading image pair #{}: {} + {}",
            generation,
            background.display(),
            subject.display()
        );
        self.spawn(generation, Plane::Background, background);
        self.spawn(generation, Plane::Subject, subject);
        generation
    }

    /// Drain finished decodes. Returns the settled outcome, if any.
    pub fn poll(&mut self) -> Option<JoinEvent> {
        let mut outcome = None;
        while let Ok(done) = self.receiver.try_recv() {
            match self.join.complete(done.generation, done.plane, done.result) {
                JoinEvent::Pending => {}
                JoinEvent::Stale => {
                    log::debug!("Dropped stale {:?} plane from load #{}", done.plane, done.generation);
                }
                settled => outcome = Some(settled),
            }
        }
        outcome
    }

    fn spawn(&self, generation: u64, plane: Plane, path: PathBuf) {
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path).map_err(|e| format!("{:#}", e));
            if let Ok(image) = &result {
                log::info!("Decoded {:?} plane {} ({}x{})", plane, path.display(), image.width(), image.height());
            }
            let _ = sender.send(Completion { generation, plane, result });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::time::{Duration, Instant};

    fn plane(color: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 3, Rgba([color, color, color, 255]))
    }

    #[test]
    fn test_join_in_either_order() {
        for first in [Plane::Background, Plane::Subject] {
            let second = if first == Plane::Background { Plane::Subject } else { Plane::Background };
            let mut join = PlaneJoin::new();
            let generation = join.begin();

            assert!(matches!(join.complete(generation, first, Ok(plane(1))), JoinEvent::Pending));
            match join.complete(generation, second, Ok(plane(2))) {
                JoinEvent::Ready(pair) => assert_eq!(pair.original_dimensions(), (4, 3)),
                other => panic!("expected ready, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_join_routes_planes() {
        let mut join = PlaneJoin::new();
        let generation = join.begin();
        join.complete(generation, Plane::Subject, Ok(plane(9)));
        let JoinEvent::Ready(pair) = join.complete(generation, Plane::Background, Ok(plane(1))) else {
            panic!("expected ready");
        };
        assert_eq!(pair.background().get_pixel(0, 0)[0], 1);
        assert_eq!(pair.subject().get_pixel(0, 0)[0], 9);
    }

    #[test]
    fn test_join_fails_once_on_either_failure() {
        let mut join = PlaneJoin::new();
        let generation = join.begin();
        assert!(matches!(
            join.complete(generation, Plane::Subject, Err("bad data".into())),
            JoinEvent::Failed(_)
        ));
        // The surviving plane arriving later does not resurrect the pair.
        assert!(matches!(
            join.complete(generation, Plane::Background, Ok(plane(1))),
            JoinEvent::Stale
        ));
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut join = PlaneJoin::new();
        let old = join.begin();
        join.complete(old, Plane::Background, Ok(plane(1)));
        let new = join.begin();

        assert!(matches!(join.complete(old, Plane::Subject, Ok(plane(1))), JoinEvent::Stale));
        assert!(matches!(join.complete(new, Plane::Subject, Ok(plane(2))), JoinEvent::Pending));
        assert!(matches!(join.complete(new, Plane::Background, Ok(plane(2))), JoinEvent::Ready(_)));
        assert!(matches!(join.complete(new, Plane::Background, Ok(plane(2))), JoinEvent::Stale));
    }

    fn poll_until_settled(loader: &mut PairLoader) -> JoinEvent {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(event) = loader.poll() {
                return event;
            }
            assert!(Instant::now() < deadline, "loader never settled");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_loader_decodes_pair_from_disk() {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        let bg_path = dir.join(format!("text-behind-bg-{}.png", id));
        let fg_path = dir.join(format!("text-behind-fg-{}.png", id));
        plane(30).save(&bg_path).unwrap();
        plane(200).save(&fg_path).unwrap();

        let mut loader = PairLoader::new();
        loader.start(bg_path.clone(), fg_path.clone());
        let event = poll_until_settled(&mut loader);
        std::fs::remove_file(&bg_path).unwrap();
        std::fs::remove_file(&fg_path).unwrap();

        match event {
            JoinEvent::Ready(pair) => assert_eq!(pair.subject().get_pixel(1, 1)[0], 200),
            other => panic!("expected ready, got {:?}", other),
        }
    }

    #[test]
    fn test_loader_reports_missing_plane() {
        let mut loader = PairLoader::new();
        loader.start(PathBuf::from("/nonexistent/bg.png"), PathBuf::from("/nonexistent/fg.png"));
        assert!(matches!(poll_until_settled(&mut loader), JoinEvent::Failed(_)));
    }
}
