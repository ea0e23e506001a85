use std::sync::mpsc::Sender;

/// Hooks into a running [`Population::solve_with`](super::Population::solve_with)
pub trait ProgressCallback {
    fn on_generation_start(&mut self, age: usize);
    fn on_generation_complete(&mut self, age: usize, best_fitness: f64, mean: f64);
}

/// Ignores every event
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation_start(&mut self, _age: usize) {}

    fn on_generation_complete(&mut self, _age: usize, _best_fitness: f64, _mean: f64) {}
}

pub struct LogProgressCallback {
    /// Report every n-th generation only
    pub every: usize,
}

impl Default for LogProgressCallback {
    fn default() -> Self {
        Self { every: 1 }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, age: usize) {
        log::trace!("Generation {} starting", age);
    }

    fn on_generation_complete(&mut self, age: usize, best_fitness: f64, mean: f64) {
        if self.every <= 1 || age % self.every == 0 {
            log::info!(
                "Generation {} complete. Best fitness: {:.4}, mean: {:.4}",
                age,
                best_fitness,
                mean
            );
        }
    }
}

// For feeding a UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete {
        age: usize,
        best_fitness: f64,
        mean: f64,
    },
}

pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, age: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(age));
    }

    fn on_generation_complete(&mut self, age: usize, best_fitness: f64, mean: f64) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            age,
            best_fitness,
            mean,
        });
    }
}
