mod persistence;
mod scenarios;
