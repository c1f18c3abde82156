mod helpers;
mod postgres_purge;
mod postgres_seed;
