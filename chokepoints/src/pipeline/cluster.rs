//! Clusterer: weighted DBSCAN over the haversine metric.
//!
//! Sample counts per request are small (tens to low hundreds of points), so this
//! uses a brute-force O(n²) neighbor scan rather than a spatial index — the simplest
//! thing that is fast enough at this scale.

use crate::pipeline::types::SamplePoint;

const NOISE: i64 = -1;
const UNVISITED: i64 = -2;

/// Runs DBSCAN with the haversine metric and weighted core-point criterion: a point
/// is a core point when the *sum of weights* of its eps-neighborhood (itself
/// included) is at least `min_samples`. Returns the non-empty, non-noise clusters.
pub fn cluster(samples: &[SamplePoint], eps_m: f64, min_samples: f64) -> Vec<Vec<SamplePoint>> {
	let n = samples.len();
	if n == 0 {
		return Vec::new();
	}

	let neighbors: Vec<Vec<usize>> = (0..n)
		.map(|i| {
			(0..n)
				.filter(|&j| samples[i].latlon().haversine_m(&samples[j].latlon()) <= eps_m)
				.collect::<Vec<usize>>()
		})
		.collect();

	let weight_sum = |idxs: &[usize]| -> f64 { idxs.iter().map(|&i| samples[i].weight).sum() };

	let mut labels = vec![UNVISITED; n];
	let mut next_label = 0i64;

	for i in 0..n {
		if labels[i] != UNVISITED {
			continue;
		}
		if weight_sum(&neighbors[i]) < min_samples {
			labels[i] = NOISE;
			continue;
		}

		let label = next_label;
		next_label += 1;
		labels[i] = label;

		let mut seeds: Vec<usize> = neighbors[i].clone();
		let mut cursor = 0;
		while cursor < seeds.len() {
			let j = seeds[cursor];
			cursor += 1;
			if labels[j] == NOISE {
				labels[j] = label;
			}
			if labels[j] != UNVISITED {
				continue;
			}
			labels[j] = label;
			if weight_sum(&neighbors[j]) >= min_samples {
				for &k in &neighbors[j] {
					if !seeds.contains(&k) {
						seeds.push(k);
					}
				}
			}
		}
	}

	let mut clusters: Vec<Vec<SamplePoint>> = vec![Vec::new(); next_label as usize];
	for (i, &label) in labels.iter().enumerate() {
		if label >= 0 {
			clusters[label as usize].push(samples[i].clone());
		}
	}
	clusters.retain(|c| !c.is_empty());
	clusters
}
