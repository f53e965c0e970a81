//! 수익률/변동성 기반 종목 클러스터링.
//!
//! 종목별 연환산 평균 수익률과 연환산 변동성을 구한 뒤
//! k-means(k-means++ 초기화, 다중 재시작)로 그룹을 나눕니다.
//! 같은 입력과 시드에서는 항상 같은 레이블이 나옵니다.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stock_core::ClusterAssignment;
use tracing::debug;

use crate::correlation::prices_to_returns;
use crate::pivot::PriceMatrix;

/// 연간 거래일 수.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// 클러스터링 실행에 필요한 최소 유효 종목 수.
pub const MIN_QUALIFYING_TICKERS: usize = 3;

/// k-means 파라미터.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringParams {
    /// 클러스터 수
    pub k: usize,
    /// 재시작 횟수 (최저 관성 결과 채택)
    pub restarts: usize,
    /// 재시작당 최대 반복
    pub max_iterations: usize,
    /// 중심 이동량 수렴 기준
    pub tolerance: f64,
    /// 난수 시드
    pub seed: u64,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            k: 3,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

/// 종목별 연환산 통계.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerStats {
    pub ticker: String,
    /// 연환산 평균 수익률
    pub returns: f64,
    /// 연환산 변동성 (표본 표준편차)
    pub volatility: f64,
    /// 실제 관측 사이의 수익률이 2개 이상인지
    pub qualifies: bool,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 가격 행렬의 각 열에 대해 연환산 수익률/변동성을 계산합니다.
///
/// 수익률은 첫 관측 이후 빈 셀을 직전 가격으로 채운 열에서 계산하므로
/// 거래가 없던 날은 0.0 수익률이 됩니다.
pub fn annualized_stats(prices: &PriceMatrix) -> Vec<TickerStats> {
    prices
        .tickers()
        .iter()
        .enumerate()
        .map(|(col, ticker)| {
            let returns = prices_to_returns(&prices.forward_filled(col));
            let observed_changes = prices.observed(col).len().saturating_sub(1);
            let n = returns.len() as f64;

            let mean = if returns.is_empty() {
                0.0
            } else {
                returns.iter().sum::<f64>() / n
            };
            // 표본 표준편차는 수익률 2개 이상에서만 정의
            let volatility = if returns.len() >= 2 {
                let variance =
                    returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
                variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
            } else {
                0.0
            };

            TickerStats {
                ticker: ticker.clone(),
                returns: finite_or_zero(mean * TRADING_DAYS_PER_YEAR),
                volatility: finite_or_zero(volatility),
                qualifies: observed_changes >= 2,
            }
        })
        .collect()
}

/// k-means 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// 입력 순서대로의 클러스터 레이블
    pub labels: Vec<usize>,
    pub centroids: Vec<[f64; 2]>,
    /// 중심까지 거리 제곱합
    pub inertia: f64,
    /// 채택된 실행의 반복 횟수
    pub iterations: usize,
}

/// 2차원 k-means.
#[derive(Debug, Clone)]
pub struct KMeans {
    params: ClusteringParams,
}

fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// 가장 가까운 중심 (동률이면 낮은 인덱스).
fn nearest(point: &[f64; 2], centroids: &[[f64; 2]]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best.1 {
            best = (idx, dist);
        }
    }
    best
}

impl KMeans {
    pub fn new(params: ClusteringParams) -> Self {
        Self { params }
    }

    /// 모든 재시작을 실행하고 관성이 가장 낮은 결과를 반환합니다.
    ///
    /// 포인트 수가 k보다 작거나 k가 0이면 None.
    pub fn fit(&self, points: &[[f64; 2]]) -> Option<KMeansResult> {
        let k = self.params.k;
        if k == 0 || points.len() < k {
            return None;
        }

        // 모든 재시작이 하나의 난수 생성기를 공유
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut best: Option<KMeansResult> = None;

        for _ in 0..self.params.restarts.max(1) {
            let result = self.run_once(points, &mut rng);
            let better = best
                .as_ref()
                .map_or(true, |current| result.inertia < current.inertia);
            if better {
                best = Some(result);
            }
        }

        best.map(|mut result| {
            result.labels = relabel_by_first_appearance(&result.labels, k);
            result
        })
    }

    fn run_once(&self, points: &[[f64; 2]], rng: &mut StdRng) -> KMeansResult {
        let mut centroids = kmeans_plus_plus(points, self.params.k, rng);
        let mut labels = vec![0usize; points.len()];
        let mut iterations = 0;

        for iter in 0..self.params.max_iterations {
            iterations = iter + 1;

            for (label, point) in labels.iter_mut().zip(points) {
                *label = nearest(point, &centroids).0;
            }

            let mut sums = vec![[0.0f64; 2]; centroids.len()];
            let mut counts = vec![0usize; centroids.len()];
            for (&label, point) in labels.iter().zip(points) {
                sums[label][0] += point[0];
                sums[label][1] += point[1];
                counts[label] += 1;
            }

            let mut shift = 0.0;
            for (idx, centroid) in centroids.iter_mut().enumerate() {
                // 빈 클러스터는 이전 중심 유지
                if counts[idx] == 0 {
                    continue;
                }
                let updated = [
                    sums[idx][0] / counts[idx] as f64,
                    sums[idx][1] / counts[idx] as f64,
                ];
                shift += squared_distance(centroid, &updated);
                *centroid = updated;
            }

            if shift <= self.params.tolerance {
                break;
            }
        }

        // 최종 중심 기준 재할당 후 관성 계산
        let mut inertia = 0.0;
        for (label, point) in labels.iter_mut().zip(points) {
            let (idx, dist) = nearest(point, &centroids);
            *label = idx;
            inertia += dist;
        }

        KMeansResult {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

/// k-means++ 초기 중심 선택.
fn kmeans_plus_plus(points: &[[f64; 2]], k: usize, rng: &mut StdRng) -> Vec<[f64; 2]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| nearest(p, &centroids).1)
            .collect();

        // 모든 거리가 0이면 (서로 다른 점이 부족) 균등 추출
        let idx = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            Err(_) => rng.gen_range(0..points.len()),
        };
        centroids.push(points[idx]);
    }

    centroids
}

/// 레이블을 첫 등장 순서(0, 1, 2, ...)로 다시 매깁니다.
fn relabel_by_first_appearance(labels: &[usize], k: usize) -> Vec<usize> {
    let mut mapping: Vec<Option<usize>> = vec![None; k];
    let mut next = 0;
    labels
        .iter()
        .map(|&label| {
            *mapping[label].get_or_insert_with(|| {
                let assigned = next;
                next += 1;
                assigned
            })
        })
        .collect()
}

/// 전체 종목 클러스터링.
///
/// 유효 종목이 3개 이상이면 모든 종목의 (수익률, 변동성)으로 k-means를 실행하고,
/// 그렇지 않으면 모든 종목을 클러스터 0으로 둡니다.
pub fn cluster_tickers(prices: &PriceMatrix, params: &ClusteringParams) -> Vec<ClusterAssignment> {
    let stats = annualized_stats(prices);
    let qualifying = stats.iter().filter(|s| s.qualifies).count();

    let labels = if qualifying >= MIN_QUALIFYING_TICKERS {
        let points: Vec<[f64; 2]> = stats.iter().map(|s| [s.returns, s.volatility]).collect();
        KMeans::new(params.clone()).fit(&points).map(|result| {
            debug!(
                inertia = result.inertia,
                iterations = result.iterations,
                "k-means 완료"
            );
            result.labels
        })
    } else {
        debug!(
            qualifying,
            required = MIN_QUALIFYING_TICKERS,
            "유효 종목 부족, 전체 클러스터 0"
        );
        None
    };

    let labels = labels.unwrap_or_else(|| vec![0; stats.len()]);
    stats
        .into_iter()
        .zip(labels)
        .map(|(s, cluster)| ClusterAssignment {
            ticker: s.ticker,
            returns: s.returns,
            volatility: s.volatility,
            cluster,
        })
        .collect()
}
