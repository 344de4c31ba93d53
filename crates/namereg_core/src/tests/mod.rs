
mod predicates;
mod stress;
