//! Genetic algorithm for evolving evaluation weights.
//!
//! Each generation runs through four steps:
//!
//! 1. **Tournament** - for every round a random permutation pairs each
//!    individual (as Red) with an opponent (as Black); the game's winner
//!    scores a win, draws score nothing
//! 2. **Fitness** - wins divided by the number of rounds
//! 3. **Selection** - parents are drawn with a [`RouletteWheel`],
//!    proportional to fitness
//! 4. **Reproduction** - uniform crossover of two parents followed by
//!    Gaussian mutation of every component
//!
//! The whole population is replaced each generation; there is no elitism.
//! The best individual of the evaluated generation is reported as the
//! champion in [`GenerationReport`].
//!
//! # Key Components
//!
//! - [`Individual`] - a genome, its fitness and the parents it came from
//! - [`Population`] - the individuals of one generation
//! - [`PopulationEvolver`] - builds the next generation
//! - [`GeneticTrainer`] - drives generations with [`GeneticParams`]
//!
//! # Selection Details
//!
//! With fitnesses `f₀ … fₙ₋₁` the wheel keeps the cumulative sums
//! `F₀ = 0, Fᵢ₊₁ = Fᵢ + fᵢ`. A draw `x` in `[0, S)` (`S = Fₙ`) picks index
//! `i` with `Fᵢ < x ≤ Fᵢ₊₁`, and `x = 0` picks index 0. Individuals without
//! wins are never chosen, except that when every game was drawn (`S = 0`)
//! every draw is 0 and so every parent is index 0.

use oxifour_engine::Piece;
use oxifour_evaluator::{EvaluationWeights, evaluator::LinearEvaluator};
use rand::{Rng, seq::SliceRandom};

use crate::{
    TrainingError,
    self_play::{self, MatchResult},
    weights::{self, Genome},
};

/// A candidate weight vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genome: Genome,
    fitness: f64,
    parents: Option<(usize, usize)>,
}

impl Individual {
    #[must_use]
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: 0.0,
            parents: None,
        }
    }

    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(weights::random(rng))
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    #[must_use]
    pub fn weights(&self) -> EvaluationWeights {
        EvaluationWeights::from_array(self.genome)
    }

    /// Wins per round in the last tournament, in `[0, 2]` since every
    /// individual plays once as Red and once as Black each round.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Indices of the parents in the previous generation, for offspring.
    #[must_use]
    pub fn parents(&self) -> Option<(usize, usize)> {
        self.parents
    }
}

/// One generation of individuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn random<R>(count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::from_genomes(vec![], count, rng)
    }

    /// Builds a population of exactly `count` individuals from stored
    /// genomes, dropping extras and topping up with random genomes.
    pub fn from_genomes<R>(genomes: Vec<Genome>, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut individuals: Vec<_> = genomes
            .into_iter()
            .take(count)
            .map(Individual::new)
            .collect();
        while individuals.len() < count {
            individuals.push(Individual::random(rng));
        }
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn genomes(&self) -> Vec<Genome> {
        self.individuals.iter().map(|ind| ind.genome).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Plays `rounds` tournament rounds and stores wins per round as fitness.
    ///
    /// Returns the tally of all tournament games.
    pub fn evaluate_fitness<R>(&mut self, rounds: usize, depth: usize, rng: &mut R) -> MatchResult
    where
        R: Rng + ?Sized,
    {
        let count = self.individuals.len();
        let evaluators: Vec<_> = self
            .individuals
            .iter()
            .map(|ind| LinearEvaluator::new(ind.weights()))
            .collect();
        let mut wins = vec![0_u32; count];
        let mut order: Vec<usize> = (0..count).collect();
        let mut results = MatchResult::default();

        for round in 0..rounds {
            order.shuffle(rng);
            for (red, &black) in order.iter().enumerate() {
                let outcome = self_play::play_match(&evaluators[red], &evaluators[black], depth);
                match outcome.winner {
                    Some(Piece::Red) => wins[red] += 1,
                    Some(Piece::Black) => wins[black] += 1,
                    Some(Piece::Empty) | None => {}
                }
                results.record(outcome.winner);
                tracing::debug!(round, red, black, winner = ?outcome.winner, "tournament game");
            }
        }

        for (ind, wins) in self.individuals.iter_mut().zip(wins) {
            ind.fitness = if rounds == 0 {
                0.0
            } else {
                f64::from(wins) / count_as_f64(rounds)
            };
        }
        results
    }

    /// First individual with the highest fitness.
    #[must_use]
    pub fn champion(&self) -> Option<&Individual> {
        self.individuals.iter().reduce(|best, ind| {
            if ind.fitness > best.fitness {
                ind
            } else {
                best
            }
        })
    }

    #[must_use]
    pub fn mean_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.individuals.iter().map(|ind| ind.fitness).sum();
        sum / count_as_f64(self.individuals.len())
    }
}

#[expect(clippy::cast_precision_loss)]
fn count_as_f64(n: usize) -> f64 {
    n as f64
}

/// Fitness-proportionate parent selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
}

impl RouletteWheel {
    #[must_use]
    pub fn new<I>(fitness: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut cumulative = vec![0.0];
        let mut total = 0.0;
        for f in fitness {
            total += f;
            cumulative.push(total);
        }
        Self { cumulative }
    }

    /// Number of slots on the wheel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cumulative.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all fitness values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Maps a point `x` in `[0, total]` to the slot whose interval
    /// `(Fᵢ, Fᵢ₊₁]` contains it.
    #[must_use]
    pub fn index_for(&self, x: f64) -> usize {
        if x <= 0.0 {
            return 0;
        }
        let k = self.cumulative.partition_point(|&f| f < x);
        k.saturating_sub(1).min(self.len().saturating_sub(1))
    }

    /// Draws one slot from `[0, total)`. A zero total always yields 0.
    pub fn spin<R>(&self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        self.index_for(rng.random::<f64>() * self.total())
    }
}

/// Builds the next generation from an evaluated one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationEvolver {
    /// Standard deviation of the Gaussian noise added to every component.
    pub mutation_sigma: f64,
}

impl PopulationEvolver {
    /// Replaces every individual with a mutated crossover of two
    /// roulette-selected parents.
    pub fn evolve<R>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<Population, TrainingError>
    where
        R: Rng + ?Sized,
    {
        if population.is_empty() {
            return Err(TrainingError::EmptyPopulation);
        }
        let noise = weights::gaussian(self.mutation_sigma)?;
        let parents = &population.individuals;
        let wheel = RouletteWheel::new(parents.iter().map(Individual::fitness));

        let individuals = (0..parents.len())
            .map(|_| {
                let p1 = wheel.spin(rng);
                let p2 = wheel.spin(rng);
                let mut genome =
                    weights::uniform_crossover(&parents[p1].genome, &parents[p2].genome, rng);
                weights::mutate(&mut genome, &noise, rng);
                Individual {
                    genome,
                    fitness: 0.0,
                    parents: Some((p1, p2)),
                }
            })
            .collect();

        Ok(Population { individuals })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticParams {
    pub population_size: usize,
    /// Tournament rounds per generation.
    pub rounds: usize,
    /// Search depth of the agents in tournament games.
    pub depth: usize,
    pub mutation_sigma: f64,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            rounds: 5,
            depth: 8,
            mutation_sigma: 0.03,
        }
    }
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub generation: usize,
    pub best_genome: Genome,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub results: MatchResult,
}

/// Runs generations one after another.
#[derive(Debug, Clone)]
pub struct GeneticTrainer {
    params: GeneticParams,
    population: Population,
    generation: usize,
}

impl GeneticTrainer {
    /// Starts from random genomes.
    pub fn random<R>(params: GeneticParams, rng: &mut R) -> Result<Self, TrainingError>
    where
        R: Rng + ?Sized,
    {
        Self::resume(params, vec![], 0, rng)
    }

    /// Continues from stored genomes, resized to the configured population.
    pub fn resume<R>(
        params: GeneticParams,
        genomes: Vec<Genome>,
        generation: usize,
        rng: &mut R,
    ) -> Result<Self, TrainingError>
    where
        R: Rng + ?Sized,
    {
        weights::gaussian(params.mutation_sigma)?;
        let population = Population::from_genomes(genomes, params.population_size, rng);
        if population.is_empty() {
            return Err(TrainingError::EmptyPopulation);
        }
        Ok(Self {
            params,
            population,
            generation,
        })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    /// The population waiting to be evaluated next.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Index of the next generation to evaluate.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Evaluates the current generation and replaces it with its offspring.
    pub fn step<R>(&mut self, rng: &mut R) -> Result<GenerationReport, TrainingError>
    where
        R: Rng + ?Sized,
    {
        let results = self
            .population
            .evaluate_fitness(self.params.rounds, self.params.depth, rng);
        let champion = self
            .population
            .champion()
            .ok_or(TrainingError::EmptyPopulation)?;
        let report = GenerationReport {
            generation: self.generation,
            best_genome: champion.genome,
            best_fitness: champion.fitness,
            mean_fitness: self.population.mean_fitness(),
            results,
        };
        tracing::info!(
            generation = report.generation,
            best_fitness = report.best_fitness,
            mean_fitness = report.mean_fitness,
            draws = results.draws,
            best = %champion.weights(),
            "generation evaluated"
        );

        let evolver = PopulationEvolver {
            mutation_sigma: self.params.mutation_sigma,
        };
        self.population = evolver.evolve(&self.population, rng)?;
        self.generation += 1;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn with_fitness(fitness: &[f64]) -> Population {
        let individuals = fitness
            .iter()
            .enumerate()
            .map(|(i, &fitness)| {
                // Components are unique across the population.
                let base = count_as_f64(i) * 10.0;
                Individual {
                    genome: [base, base + 1.0, base + 2.0, base + 3.0, base + 4.0, base + 5.0],
                    fitness,
                    parents: None,
                }
            })
            .collect();
        Population::new(individuals)
    }

    #[test]
    fn test_roulette_maps_intervals_to_indices() {
        let wheel = RouletteWheel::new([0.25, 0.0, 0.5, 0.25]);
        assert_eq!(wheel.len(), 4);
        assert_eq!(wheel.total(), 1.0);
        assert_eq!(wheel.index_for(0.0), 0);
        assert_eq!(wheel.index_for(0.1), 0);
        assert_eq!(wheel.index_for(0.25), 0);
        assert_eq!(wheel.index_for(0.3), 2);
        assert_eq!(wheel.index_for(0.75), 2);
        assert_eq!(wheel.index_for(0.76), 3);
        assert_eq!(wheel.index_for(1.0), 3);
        assert_eq!(wheel.index_for(1.5), 3);
    }

    #[test]
    fn test_roulette_skips_zero_fitness() {
        let wheel = RouletteWheel::new([0.0, 0.4, 0.0, 0.6]);
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..200 {
            let i = wheel.spin(&mut rng);
            assert!(i == 1 || i == 3, "picked {i}");
        }
    }

    #[test]
    fn test_roulette_without_wins_picks_first() {
        let wheel = RouletteWheel::new([0.0; 4]);
        assert_eq!(wheel.total(), 0.0);
        let mut rng = Pcg64Mcg::seed_from_u64(8);
        for _ in 0..50 {
            assert_eq!(wheel.spin(&mut rng), 0);
        }
    }

    #[test]
    fn test_all_draws_breed_from_first_individual() {
        let population = with_fitness(&[0.0; 4]);
        let evolver = PopulationEvolver {
            mutation_sigma: 0.0,
        };
        let mut rng = Pcg64Mcg::seed_from_u64(9);
        let next = evolver.evolve(&population, &mut rng).unwrap();
        for child in next.individuals() {
            assert_eq!(child.parents(), Some((0, 0)));
            assert_eq!(child.genome(), population.individuals()[0].genome());
        }
    }

    #[test]
    fn test_zero_sigma_offspring_are_exact_crossovers() {
        let population = with_fitness(&[0.2, 0.0, 0.6, 0.2]);
        let evolver = PopulationEvolver {
            mutation_sigma: 0.0,
        };
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let next = evolver.evolve(&population, &mut rng).unwrap();

        assert_eq!(next.len(), population.len());
        for child in next.individuals() {
            let (p1, p2) = child.parents().unwrap();
            assert_ne!(p1, 1);
            assert_ne!(p2, 1);
            let g1 = population.individuals()[p1].genome();
            let g2 = population.individuals()[p2].genome();
            for (i, w) in child.genome().iter().enumerate() {
                assert!(*w == g1[i] || *w == g2[i], "component {i} = {w}");
            }
            assert_eq!(child.fitness(), 0.0);
        }
    }

    #[test]
    fn test_evolve_rejects_empty_population() {
        let evolver = PopulationEvolver {
            mutation_sigma: 0.03,
        };
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        assert_eq!(
            evolver.evolve(&Population::new(vec![]), &mut rng),
            Err(TrainingError::EmptyPopulation)
        );
    }

    #[test]
    fn test_champion_is_first_best() {
        let population = with_fitness(&[0.2, 0.6, 0.6, 0.0]);
        let champion = population.champion().unwrap();
        assert_eq!(champion.genome()[0], 10.0);
        assert!((population.mean_fitness() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_from_genomes_tops_up_and_truncates() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let stored = vec![[0.5; 6], [0.25; 6]];
        let population = Population::from_genomes(stored.clone(), 5, &mut rng);
        assert_eq!(population.len(), 5);
        assert_eq!(&population.genomes()[..2], &stored[..]);

        let population = Population::from_genomes(stored, 1, &mut rng);
        assert_eq!(population.genomes(), vec![[0.5; 6]]);
    }

    #[test]
    fn test_tournament_fitness_counts_wins() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let mut population = Population::random(4, &mut rng);
        let results = population.evaluate_fitness(2, 1, &mut rng);
        for ind in population.individuals() {
            assert!((0.0..=2.0).contains(&ind.fitness()));
        }
        // Four games per round, at most one win each.
        assert_eq!(results.games(), 8);
        let total_wins: f64 = population.individuals().iter().map(|i| i.fitness() * 2.0).sum();
        assert_eq!(total_wins, count_as_f64(results.red_wins + results.black_wins));
    }

    #[test]
    fn test_trainer_step() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let params = GeneticParams {
            population_size: 4,
            rounds: 1,
            depth: 1,
            mutation_sigma: 0.03,
        };
        let mut trainer = GeneticTrainer::random(params, &mut rng).unwrap();
        let report = trainer.step(&mut rng).unwrap();
        assert_eq!(report.generation, 0);
        assert!((0.0..=2.0).contains(&report.best_fitness));
        assert!(report.mean_fitness <= report.best_fitness);
        assert_eq!(report.results.games(), 4);
        assert_eq!(trainer.generation(), 1);
        assert_eq!(trainer.population().len(), 4);
        assert!(
            trainer
                .population()
                .individuals()
                .iter()
                .all(|ind| ind.parents().is_some())
        );
    }

    #[test]
    fn test_zero_sigma_generation_yields_exact_crossovers() {
        let mut rng = Pcg64Mcg::seed_from_u64(21);
        let params = GeneticParams {
            population_size: 4,
            rounds: 1,
            depth: 2,
            mutation_sigma: 0.0,
        };
        let mut trainer = GeneticTrainer::random(params, &mut rng).unwrap();
        let parents = trainer.population().genomes();
        trainer.step(&mut rng).unwrap();

        let children = trainer.population().individuals();
        assert_eq!(children.len(), 4);
        for child in children {
            let (p1, p2) = child.parents().unwrap();
            for (i, w) in child.genome().iter().enumerate() {
                assert!(
                    *w == parents[p1][i] || *w == parents[p2][i],
                    "component {i} = {w}"
                );
            }
        }
    }

    #[test]
    fn test_trainer_rejects_bad_sigma() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let params = GeneticParams {
            mutation_sigma: f64::NAN,
            ..GeneticParams::default()
        };
        assert!(matches!(
            GeneticTrainer::random(params, &mut rng),
            Err(TrainingError::InvalidMutationSigma { .. })
        ));
    }
}
