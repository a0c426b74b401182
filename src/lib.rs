//! Multi-objective flexible job-shop scheduling (FJSP).
//!
//! Each operation may run on any of several candidate machines with a
//! machine-dependent processing time. A solution picks a machine for every
//! operation and an order on every machine; the search keeps the set of
//! non-dominated trade-offs between competing objectives (makespan, flow
//! time, tardiness, energy, workload, ...).
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Operation`, `Job`, `Machine`, `Instance`, `Schedule`
//! - **`validation`**: Structural checks run when an instance is built
//! - **`graph`**: Disjunctive graph (index-based arena of operation nodes)
//! - **`encoding`**: OSV/MAV chromosome and variation operators
//! - **`decoder`**: Semi-active schedule builder
//! - **`evaluation`**: Schedule KPIs and the objective registry
//! - **`pareto`**: Dominance, non-dominated sorting, crowding, archive, indicators
//! - **`search`**: NSGA-II engine, random baseline, the `Solver` contract
//! - **`generator`** / **`fjsplib`**: Instance sources
//!
//! # Example
//!
//! ```
//! use u_fjsp::evaluation::ObjectiveSet;
//! use u_fjsp::generator::{generate, GeneratorConfig};
//! use u_fjsp::pareto::{hypervolume, reference_point};
//! use u_fjsp::search::{Nsga2, SearchConfig};
//!
//! let instance = generate(&GeneratorConfig::new(4, 3).with_seed(1)).unwrap();
//! let objectives = ObjectiveSet::from_names(["makespan", "total_workload"]).unwrap();
//! let config = SearchConfig::default().with_population_size(16).with_max_generations(10);
//!
//! let report = Nsga2::new(&instance, objectives, config).unwrap().run().unwrap();
//! let front = report.objectives();
//! assert!(hypervolume(&front, &reference_point(&front, 1.1)) > 0.0);
//! ```
//!
//! # References
//!
//! - Brandimarte (1993), "Routing and scheduling in a flexible job shop by tabu search"
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod decoder;
pub mod encoding;
pub mod error;
pub mod evaluation;
pub mod fjsplib;
pub mod generator;
pub mod graph;
pub mod models;
pub mod pareto;
pub mod search;
pub mod validation;

pub use error::{Error, Result};
