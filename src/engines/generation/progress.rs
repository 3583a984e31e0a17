use std::sync::mpsc::Sender;

/// Observer for a running evolution.
///
/// Generation numbers are zero-based.
pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_evaluation_complete(&mut self, generation: usize, evaluated: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_of_fame_size: usize);
}

/// Reports through the `log` facade every `interval` generations
pub struct LogProgressCallback {
    interval: usize,
}

impl LogProgressCallback {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::trace!("Generation {} starting", generation);
    }

    fn on_evaluation_complete(&mut self, generation: usize, evaluated: usize) {
        log::debug!("Generation {}: evaluated {} programs", generation, evaluated);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hof_size: usize) {
        if generation % self.interval == 0 {
            log::info!(
                "Generation {} complete. Best fitness: {:.4}, Hall of Fame size: {}",
                generation, best_fitness, hof_size
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    EvaluationComplete { generation: usize, evaluated: usize },
    GenerationComplete { generation: usize, best_fitness: f64, hof_size: usize },
}

/// Forwards progress over a channel, e.g. to another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_evaluation_complete(&mut self, generation: usize, evaluated: usize) {
        let _ = self.sender.send(ProgressMessage::EvaluationComplete {
            generation,
            evaluated,
        });
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hof_size: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            best_fitness,
            hof_size,
        });
    }
}
