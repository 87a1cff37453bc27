//! 本地记忆检索：对笔记与任务做 TF-IDF + 余弦相似度
//!
//! 分词为小写 + 空白切分；IDF = ln((N+1)/(df+1)) + 1；仅返回得分 > 0 的结果，按得分降序。

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::memory::StoreDocument;

/// 命中的记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    Note,
    Task,
}

/// 单条检索结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub kind: HitKind,
    pub id: u64,
    /// 保留 4 位小数
    pub score: f64,
    pub text: String,
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

fn inverse_document_frequency(docs: &[Vec<String>]) -> HashMap<String, f64> {
    let n = docs.len() as f64;
    let mut df: HashMap<&str, usize> = HashMap::new();
    for tokens in docs {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for w in unique {
            *df.entry(w).or_insert(0) += 1;
        }
    }
    df.into_iter()
        .map(|(w, count)| (w.to_string(), ((n + 1.0) / (count as f64 + 1.0)).ln() + 1.0))
        .collect()
}

fn tfidf_vector(tokens: &[String], idf: &HashMap<String, f64>) -> HashMap<String, f64> {
    let mut tf: HashMap<&str, f64> = HashMap::new();
    for t in tokens {
        *tf.entry(t.as_str()).or_insert(0.0) += 1.0;
    }
    tf.into_iter()
        .map(|(w, count)| (w.to_string(), count * idf.get(w).copied().unwrap_or(0.0)))
        .collect()
}

fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .map(|(w, x)| x * b.get(w).copied().unwrap_or(0.0))
        .sum();
    let mag_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.values().map(|x| x * x).sum::<f64>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// 在笔记与任务中检索与 query 最相似的记录
pub fn search(doc: &StoreDocument, query: &str) -> Vec<SearchHit> {
    let mut documents = Vec::new();
    let mut meta = Vec::new();
    for n in &doc.notes {
        documents.push(tokenize(&n.text));
        meta.push((HitKind::Note, n.id, n.text.clone()));
    }
    for t in &doc.tasks {
        documents.push(tokenize(&t.text));
        meta.push((HitKind::Task, t.id, t.text.clone()));
    }
    if documents.is_empty() {
        return Vec::new();
    }

    let idf = inverse_document_frequency(&documents);
    let query_vec = tfidf_vector(&tokenize(query), &idf);

    let mut hits: Vec<SearchHit> = documents
        .iter()
        .zip(meta)
        .filter_map(|(tokens, (kind, id, text))| {
            let score = cosine_similarity(&query_vec, &tfidf_vector(tokens, &idf));
            (score > 0.0).then(|| SearchHit {
                kind,
                id,
                score: (score * 10_000.0).round() / 10_000.0,
                text,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Note, Task};

    fn sample() -> StoreDocument {
        StoreDocument {
            notes: vec![
                Note {
                    id: 1,
                    text: "Buy almond milk".to_string(),
                },
                Note {
                    id: 2,
                    text: "Rust ownership rules".to_string(),
                },
            ],
            tasks: vec![Task {
                id: 1,
                text: "Call the milk supplier".to_string(),
                done: false,
                created_at: None,
                completed_at: None,
            }],
        }
    }

    #[test]
    fn test_search_ranks_best_match_first() {
        let hits = search(&sample(), "almond milk");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, HitKind::Note);
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits[1].kind, HitKind::Task);
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_search_no_overlap_is_empty() {
        assert!(search(&sample(), "quantum physics").is_empty());
        assert!(search(&StoreDocument::default(), "milk").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let hits = search(&sample(), "RUST");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }
}
