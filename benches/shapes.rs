use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shapes::arb::{
    build_graph, find_shapes_in_graph, MarketCatalogue, SearchOptions, TickerCatalogue,
};
use std::collections::HashMap;

/// Quote currencies most venues list against
const QUOTES: [&str; 4] = ["USDT", "USDC", "BTC", "ETH"];

/// Generate a synthetic multi-venue catalogue.
///
/// Every venue lists `markets_per_venue` random pairs out of `currency_count` currencies,
/// quoted in one of a handful of common quotes, the way real exchanges skew towards them.
fn generate_catalogue(
    venue_count: usize,
    markets_per_venue: usize,
    currency_count: usize,
) -> MarketCatalogue {
    fastrand::seed(7);
    let currencies: Vec<String> = (0..currency_count).map(|i| format!("C{i:03}")).collect();

    (0..venue_count)
        .map(|venue| {
            let mut symbols = HashMap::with_capacity(markets_per_venue);
            while symbols.len() < markets_per_venue {
                let base = &currencies[fastrand::usize(..currencies.len())];
                let quote = QUOTES[fastrand::usize(..QUOTES.len())];
                symbols.insert(format!("{base}/{quote}"), None);
            }
            (format!("venue{venue}"), symbols)
        })
        .collect()
}

/// Benchmark the cycle search over growing catalogues
fn bench_find_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_shapes");
    group.sample_size(10);
    group.measurement_time(std::time::Duration::from_secs(5));

    let options = SearchOptions::new(&[2, 3], Some(2)).expect("valid lengths");

    for (venue_count, markets_per_venue) in [(2, 50), (4, 100), (8, 150)] {
        let catalogue = generate_catalogue(venue_count, markets_per_venue, markets_per_venue / 2);
        let graph = build_graph(&catalogue, &TickerCatalogue::new());

        println!(
            "{venue_count} venues: {} markets, {} edges",
            graph.len(),
            graph.edge_count()
        );

        group.throughput(criterion::Throughput::Elements(graph.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{venue_count}x{markets_per_venue}")),
            &graph,
            |b, graph| b.iter(|| black_box(find_shapes_in_graph(graph, &options))),
        );
    }

    group.finish();
}

/// Benchmark normalization, ranking and graph construction on their own
fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    group.sample_size(10);

    for venue_count in [2, 8] {
        let catalogue = generate_catalogue(venue_count, 150, 75);
        group.bench_with_input(
            BenchmarkId::from_parameter(venue_count),
            &catalogue,
            |b, catalogue| b.iter(|| black_box(build_graph(catalogue, &TickerCatalogue::new()))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_find_shapes, bench_build_graph);
criterion_main!(benches);
