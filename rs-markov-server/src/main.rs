use std::path::PathBuf;
use std::sync::Mutex;

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use rs_markov_core::corpus::read_words;
use rs_markov_core::{Chain, ChainError, Generator};

/// Serves sequences generated from a word chain built at startup.
#[derive(Parser, Debug)]
#[command(name = "rs-markov-server", version)]
struct Args {
	/// Text file the chain is built from.
	#[arg(long, value_name = "PATH")]
	corpus: PathBuf,

	/// Seed of the random generator (random if omitted).
	#[arg(long)]
	seed: Option<u64>,

	/// Number of words to read from the corpus (whole file if omitted).
	#[arg(long)]
	words: Option<usize>,

	/// Address to listen on.
	#[arg(long, default_value = "127.0.0.1:5000")]
	bind: String,
}

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
	max_length: Option<usize>,
	start: Option<String>,
}

/// The chain is read-only once the server runs; only the generator's
/// random source changes between requests.
struct SharedData {
	chain: Chain,
	generator: Generator,
}

const DEFAULT_MAX_LENGTH: usize = 20;
const MAX_COUNT: usize = 1000;

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `count` sequences (default 1) of at most `max_length` words
/// (default 20), one per line. `start` forces the first word.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	let max_length = query.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
	if count > MAX_COUNT {
		return HttpResponse::BadRequest().body(format!("count must be <= {MAX_COUNT}"));
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	let SharedData { chain, generator } = &mut *shared_data;

	let start = match &query.start {
		None => None,
		Some(word) => match chain.find(word) {
			Some(id) => Some(id),
			None => return HttpResponse::BadRequest().body(format!("Unknown start word: {word}")),
		},
	};

	let mut lines = Vec::with_capacity(count);
	for _ in 0..count {
		match generator.generate(chain, start, max_length) {
			Ok(sequence) => lines.push(sequence.to_string()),
			Err(e @ ChainError::InvalidLength(_)) => return HttpResponse::BadRequest().body(e.to_string()),
			Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
		}
	}

	HttpResponse::Ok().body(lines.join("\n"))
}

/// HTTP GET endpoint `/v1/states`
///
/// Returns the number of distinct and of non-terminal states.
#[get("/v1/states")]
async fn get_states(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	HttpResponse::Ok().body(format!(
		"states: {}\nnon-terminal: {}",
		shared_data.chain.len(),
		shared_data.chain.non_terminal_count()
	))
}

/// Reads the corpus and builds the chain before any request is served.
fn build_chain(args: &Args) -> anyhow::Result<Chain> {
	let words = read_words(&args.corpus, args.words)
		.with_context(|| format!("cannot read {}", args.corpus.display()))?;
	let mut chain = Chain::new();
	chain.ingest(&words).context("cannot build the chain")?;
	Ok(chain)
}

/// Main entry point for the server.
///
/// Builds the chain, wraps it with the generator in a `Mutex`,
/// and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::init();
	let args = Args::parse();

	let chain = build_chain(&args)?;
	info!("{} states loaded from {}", chain.len(), args.corpus.display());

	let generator = match args.seed {
		Some(seed) => Generator::seeded(seed),
		None => Generator::new(StdRng::from_os_rng()),
	};
	let shared_chain = web::Data::new(Mutex::new(SharedData { chain, generator }));

	info!("listening on {}", args.bind);
	HttpServer::new(move || {
		App::new()
			.app_data(shared_chain.clone())
			.service(get_generated)
			.service(get_states)
	})
		.bind(&args.bind)?
		.run()
		.await?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use actix_web::test;

	use super::*;

	fn app_data(seed: u64) -> web::Data<Mutex<SharedData>> {
		let mut chain = Chain::new();
		chain
			.ingest(["the", "cat", "sat", "down.", "the", "dog", "ran."])
			.unwrap();
		web::Data::new(Mutex::new(SharedData { chain, generator: Generator::seeded(seed) }))
	}

	#[actix_web::test]
	async fn generate_from_start_word() {
		let app = test::init_service(App::new().app_data(app_data(1)).service(get_generated)).await;
		let request = test::TestRequest::get().uri("/v1/generate?count=5&start=the").to_request();
		let response = test::call_service(&app, request).await;
		assert!(response.status().is_success());

		let body = test::read_body(response).await;
		let body = std::str::from_utf8(&body).unwrap();
		assert_eq!(body.lines().count(), 5);
		for line in body.lines() {
			assert!(line == "the cat sat down." || line == "the dog ran.", "unexpected {line:?}");
		}
	}

	#[actix_web::test]
	async fn unknown_start_word_is_bad_request() {
		let app = test::init_service(App::new().app_data(app_data(1)).service(get_generated)).await;
		let request = test::TestRequest::get().uri("/v1/generate?start=bird").to_request();
		let response = test::call_service(&app, request).await;
		assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn zero_length_is_bad_request() {
		let app = test::init_service(App::new().app_data(app_data(1)).service(get_generated)).await;
		let request = test::TestRequest::get().uri("/v1/generate?max_length=0").to_request();
		let response = test::call_service(&app, request).await;
		assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn states_reports_counts() {
		let app = test::init_service(App::new().app_data(app_data(1)).service(get_states)).await;
		let request = test::TestRequest::get().uri("/v1/states").to_request();
		let body = test::call_and_read_body(&app, request).await;
		assert_eq!(std::str::from_utf8(&body).unwrap(), "states: 6\nnon-terminal: 4");
	}
}
