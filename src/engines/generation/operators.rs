use crate::config::evolution::SelectionMethod;
use crate::engines::evaluation::WORST_FITNESS;
use crate::engines::generation::individual::Individual;
use crate::error::{GpsynthError, Result};
use crate::functions::palette::FunctionPalette;
use crate::program::model::{Expression, Function};
use crate::program::skeleton::LOCAL_PREFIX;
use crate::program::validator::{validate_body, Scope};
use rand::seq::SliceRandom;
use rand::Rng;

/// Probability that a generated expression writes straight to an output
/// parameter instead of defining a new local.
pub const OUTPUT_BIAS: f64 = 0.5;

/// Bounds shared by the structural operators
#[derive(Debug, Clone, Copy)]
pub struct OperatorLimits {
    /// Maximum body length
    pub expressions_count: usize,
    /// Extra attempts after a rejected child
    pub retries: usize,
}

fn fitness_of(individual: &Individual) -> f64 {
    individual.fitness().unwrap_or(WORST_FITNESS)
}

fn target_function<'a>(individual: &'a Individual, target: &str) -> Result<&'a Function> {
    individual
        .program()
        .function(target)
        .ok_or_else(|| GpsynthError::Configuration(format!("Function {} not found", target)))
}

/// Uniform selection: every individual is equally likely
pub fn uniform_selection<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    rng.gen_range(0..population.len())
}

/// Tournament selection: pick best of K random candidates
pub fn tournament_selection<R: Rng>(
    population: &[Individual],
    tournament_size: usize,
    rng: &mut R,
) -> usize {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = fitness_of(&population[best_idx]);

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        let fitness = fitness_of(&population[idx]);
        if fitness < best_fitness {
            best_idx = idx;
            best_fitness = fitness;
        }
    }

    best_idx
}

/// Roulette wheel selection with weight `1 / (1 + fitness)`
pub fn roulette_selection<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    let weights: Vec<f64> = population
        .iter()
        .map(|ind| 1.0 / (1.0 + fitness_of(ind).max(0.0)))
        .collect();
    let total: f64 = weights.iter().sum();

    if !total.is_finite() || total <= 0.0 {
        return uniform_selection(population, rng);
    }

    let mut spin = rng.gen::<f64>() * total;
    for (i, weight) in weights.iter().enumerate() {
        spin -= weight;
        if spin <= 0.0 {
            return i;
        }
    }

    population.len() - 1
}

pub fn select_parent<'a, R: Rng>(
    population: &'a [Individual],
    method: SelectionMethod,
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual {
    let idx = match method {
        SelectionMethod::Uniform => uniform_selection(population, rng),
        SelectionMethod::Tournament => tournament_selection(population, tournament_size, rng),
        SelectionMethod::Roulette => roulette_selection(population, rng),
    };
    &population[idx]
}

/// Generate one expression that is valid at `position` under `scope`
pub fn random_expression<R: Rng>(
    function: &Function,
    scope: &Scope,
    palette: &FunctionPalette,
    position: usize,
    rng: &mut R,
) -> Result<Expression> {
    let entry = palette
        .sample_matching(rng, |e| scope.has_type(e.operand_type))
        .ok_or_else(|| {
            GpsynthError::StructuralMutation(format!(
                "No palette entry accepts the variables in scope of {}",
                function.name
            ))
        })?;

    let operands = scope.variables_of(entry.operand_type);
    let mut inputs = Vec::with_capacity(entry.arity);
    for _ in 0..entry.arity {
        if let Some(name) = operands.choose(rng) {
            inputs.push(name.to_string());
        }
    }

    let targets: Vec<&str> = function
        .outputs
        .iter()
        .filter(|p| p.data_type == entry.result_type)
        .map(|p| p.name.as_str())
        .collect();
    let output = match targets.choose(rng) {
        Some(name) if rng.gen_bool(OUTPUT_BIAS) => name.to_string(),
        _ => format!("{}_{}", LOCAL_PREFIX, position),
    };

    Ok(Expression {
        operator: entry.name.clone(),
        inputs,
        output,
    })
}

/// Generate a body of `1..=max_len` expressions, valid by construction
pub fn random_body<R: Rng>(
    function: &Function,
    palette: &FunctionPalette,
    max_len: usize,
    rng: &mut R,
) -> Result<Vec<Expression>> {
    let len = rng.gen_range(1..=max_len.max(1));
    let mut scope = Scope::new(function);
    let mut body = Vec::with_capacity(len);

    for position in 0..len {
        let expr = random_expression(function, &scope, palette, position, rng)?;
        scope.apply(&expr, palette)?;
        body.push(expr);
    }

    Ok(body)
}

/// Single-point recombination of the target bodies of `a` and `b`.
///
/// The child is `a[..cut_a] ++ b[cut_b..]`, truncated to `max_len`. An
/// empty parent always contributes a cut of 0. Fails when the spliced body
/// is not structurally valid.
pub fn try_recombine<R: Rng>(
    a: &Individual,
    b: &Individual,
    target: &str,
    palette: &FunctionPalette,
    max_len: usize,
    rng: &mut R,
) -> Result<Vec<Expression>> {
    let body_a = a.body(target)?;
    let body_b = b.body(target)?;

    let cut_a = if body_a.is_empty() { 0 } else { rng.gen_range(0..=body_a.len()) };
    let cut_b = if body_b.is_empty() { 0 } else { rng.gen_range(0..=body_b.len()) };

    let mut child: Vec<Expression> = body_a[..cut_a].to_vec();
    child.extend(body_b[cut_b..].iter().cloned());
    child.truncate(max_len);

    validate_body(target_function(a, target)?, &child, palette)?;
    Ok(child)
}

/// Produce one child from `a` and `b` without touching either parent.
///
/// Rejected splices are retried with new cuts; once the retries are spent
/// the child receives a fresh random body instead.
pub fn crossover<R: Rng>(
    a: &Individual,
    b: &Individual,
    target: &str,
    palette: &FunctionPalette,
    limits: OperatorLimits,
    rng: &mut R,
) -> Individual {
    for attempt in 0..=limits.retries {
        match try_recombine(a, b, target, palette, limits.expressions_count, rng) {
            Ok(body) => match a.with_body(target, body) {
                Ok(child) => return child,
                Err(e) => {
                    log::debug!("Crossover attempt {} failed: {}", attempt + 1, e);
                }
            },
            Err(e) => {
                log::debug!("Crossover attempt {} rejected: {}", attempt + 1, e);
            }
        }
    }

    log::warn!("Crossover retries exhausted, using a fresh random body");
    let fresh = target_function(a, target)
        .and_then(|function| random_body(function, palette, limits.expressions_count, rng))
        .and_then(|body| a.with_body(target, body));

    match fresh {
        Ok(child) => child,
        Err(e) => {
            log::warn!("Fallback body generation failed ({}), cloning parent", e);
            a.clone()
        }
    }
}

/// Point mutation: with probability `rate`, replace one expression with a
/// freshly generated one. A mutation that cannot be made valid within the
/// retry budget leaves the individual unchanged.
pub fn mutate<R: Rng>(
    individual: &mut Individual,
    target: &str,
    palette: &FunctionPalette,
    rate: f64,
    limits: OperatorLimits,
    rng: &mut R,
) {
    if rate <= 0.0 || !rng.gen_bool(rate.min(1.0)) {
        return;
    }

    let (function, body) = match (target_function(individual, target), individual.body(target)) {
        (Ok(function), Ok(body)) if !body.is_empty() => (function.clone(), body.to_vec()),
        _ => return,
    };

    for _ in 0..=limits.retries {
        let position = rng.gen_range(0..body.len());

        let mut scope = Scope::new(&function);
        if body[..position].iter().try_for_each(|e| scope.apply(e, palette)).is_err() {
            return;
        }

        let replacement = match random_expression(&function, &scope, palette, position, rng) {
            Ok(expr) => expr,
            Err(_) => return,
        };

        let mut candidate = body.clone();
        candidate[position] = replacement;
        if validate_body(&function, &candidate, palette).is_ok() {
            if let Err(e) = individual.replace_body(target, candidate) {
                log::debug!("Mutation discarded: {}", e);
            }
            return;
        }
    }
}
