use crate::engines::generation::individual::Individual;
use crate::program::model::Program;
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct EliteProgram {
    pub program: Program,
    pub fitness: f64,
    pub canonical_string: String, // For deduplication
}

impl EliteProgram {
    /// Snapshot an evaluated individual; `None` if it has no fitness yet
    pub fn from_individual(individual: &Individual, target: &str) -> Option<Self> {
        let fitness = individual.fitness()?;
        Some(Self {
            program: individual.program().clone(),
            fitness,
            canonical_string: individual.canonical_string(target),
        })
    }
}

/// Best distinct programs seen so far, ordered by ascending fitness.
///
/// Entries are deep copies, so later changes to the population never reach
/// them. Ties keep insertion order, so the leading entry is only replaced by
/// a strictly better program.
pub struct HallOfFame {
    programs: Vec<EliteProgram>,
    max_size: usize,
    seen_signatures: HashSet<String>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            programs: Vec::new(),
            max_size: max_size.max(1),
            seen_signatures: HashSet::new(),
        }
    }

    /// Attempt to add a program. Returns false for duplicates and for
    /// entries that fall off the end.
    pub fn try_add(&mut self, program: EliteProgram) -> bool {
        if self.seen_signatures.contains(&program.canonical_string) {
            return false;
        }
        if self.programs.len() >= self.max_size
            && self
                .programs
                .last()
                .is_some_and(|worst| program.fitness >= worst.fitness)
        {
            return false;
        }

        self.seen_signatures.insert(program.canonical_string.clone());
        self.programs.push(program);

        // Stable, so equal fitness never overtakes an older entry
        self.programs.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));

        while self.programs.len() > self.max_size {
            if let Some(removed) = self.programs.pop() {
                self.seen_signatures.remove(&removed.canonical_string);
            }
        }

        true
    }

    pub fn best(&self) -> Option<&EliteProgram> {
        self.programs.first()
    }

    pub fn get_all(&self) -> &[EliteProgram] {
        &self.programs
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
