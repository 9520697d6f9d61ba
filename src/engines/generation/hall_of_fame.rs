use crate::engines::generation::genome::Genome;
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct EliteWarrior {
    pub genome: Genome,
    pub fitness: f64,
    /// Encoded Redcode listing; doubles as the canonical string for
    /// deduplication, since different genomes can compile to the same
    /// warrior.
    pub program: String,
    pub generation: usize,
}

/// Keeps the best distinct warriors seen across the whole run.
pub struct HallOfFame {
    warriors: Vec<EliteWarrior>,
    max_size: usize,
    seen_programs: HashSet<String>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            warriors: Vec::new(),
            max_size,
            seen_programs: HashSet::new(),
        }
    }

    /// Attempt to add a warrior; rejects duplicates by program text.
    pub fn try_add(&mut self, warrior: EliteWarrior) -> bool {
        if self.seen_programs.contains(&warrior.program) {
            return false;
        }

        self.seen_programs.insert(warrior.program.clone());
        self.warriors.push(warrior);

        self.warriors
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal));
        if self.warriors.len() > self.max_size {
            for dropped in self.warriors.drain(self.max_size..) {
                self.seen_programs.remove(&dropped.program);
            }
        }

        true
    }

    pub fn best(&self) -> Option<&EliteWarrior> {
        self.warriors.first()
    }

    pub fn get_all(&self) -> &[EliteWarrior] {
        &self.warriors
    }

    pub fn len(&self) -> usize {
        self.warriors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warriors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warrior(fitness: f64, program: &str) -> EliteWarrior {
        EliteWarrior {
            genome: vec![0; 10],
            fitness,
            program: program.to_string(),
            generation: 0,
        }
    }

    #[test]
    fn keeps_best_and_dedups() {
        let mut hall = HallOfFame::new(2);
        assert!(hall.try_add(warrior(1.0, "a")));
        assert!(!hall.try_add(warrior(2.0, "a")), "duplicate program accepted");
        assert!(hall.try_add(warrior(3.0, "b")));
        assert!(hall.try_add(warrior(2.0, "c")));
        assert_eq!(hall.len(), 2);
        assert_eq!(hall.best().unwrap().fitness, 3.0);
    }
}
