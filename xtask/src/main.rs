use std::time::{Duration, Instant};
use rand::{seq::SliceRandom, thread_rng};
use reqwest::Client;
use hdrhistogram::Histogram;
use serde_json::Value;


/// Drives multi-turn conversations against a running service, carrying the
/// returned history into each follow-up, and reports per-turn latency.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args().nth(1).unwrap_or_else(|| "http://127.0.0.1:5000/api/conversation".to_string());
    let clients = 4usize; // concurrent conversations
    let turns = 5usize; // turns per conversation
    let rounds = 5usize; // conversations per client
    let questions = vec!["What are your opening hours?", "How do I reset my password?", "Do you ship internationally?", "Can I return an item?", "How long does delivery take?", "Is there a warranty?", "How do I contact support?", "Do you offer gift cards?"];

    let client = Client::builder().pool_idle_timeout(Duration::from_secs(10)).timeout(Duration::from_secs(60)).build()?;
    let mut hist = Histogram::<u64>::new(3)?;
    let mut errors = 0usize;
    let mut max_history = 0usize;

    let start = Instant::now();
    let mut tasks = vec![];
    for _ in 0..clients {
        let client = client.clone();
        let url = url.clone();
        let questions = questions.clone();
        tasks.push(tokio::spawn(async move {
            let mut latencies = vec![];
            let mut errs = 0;
            let mut longest = 0;
            for _ in 0..rounds {
                let mut history = String::new();
                for _ in 0..turns {
                    let q = {
                        let mut rng = thread_rng();
                        questions.choose(&mut rng).copied().unwrap_or("Hello?")
                    };
                    let t0 = Instant::now();
                    let res = client.post(&url).json(&serde_json::json!({"question": q, "history": &history})).send().await;
                    let dur = t0.elapsed();
                    let body = match res {
                        Ok(r) if r.status().is_success() => r.json::<Value>().await.ok(),
                        _ => None,
                    };
                    match body.as_ref().and_then(|v| v["history"].as_str()) {
                        Some(h) => {
                            latencies.push(dur);
                            history = h.to_string();
                            longest = longest.max(history.len());
                        }
                        // conversation is broken; start the next one
                        None => { errs += 1; break; }
                    }
                }
            }
            (latencies, errs, longest)
        }));
    }

    for t in tasks { let (ls, e, l) = t.await?; for d in ls { hist.record(d.as_millis() as u64).ok(); } errors += e; max_history = max_history.max(l); }

    println!("ran {} conversations x {} turns in {:?}", clients * rounds, turns, start.elapsed());
    println!("ok turns: {}", hist.len());
    println!("errors: {}", errors);
    println!("longest history: {} bytes", max_history);
    println!("p50: {} ms", hist.value_at_quantile(0.50));
    println!("p95: {} ms", hist.value_at_quantile(0.95));
    println!("p99: {} ms", hist.value_at_quantile(0.99));
    Ok(())
}
