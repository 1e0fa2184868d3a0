// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge extraction from analyzed content.
//!
//! Derives typed entities and typed relationships from the analysis text.
//! Two tiers: trust the analyzer's structured extraction when the feature
//! flag enables it, or fall back to confidence-scored keyword matching plus
//! proximity heuristics. Deduplication and threshold gating always run after
//! either tier.

use std::collections::{HashMap, HashSet};

use engram_core::analysis::{AnalysisResult, LlmExtraction};
use engram_core::types::{Attribution, RecordId};
use engram_config::ExtractionConfig;
use tracing::{debug, warn};

use crate::types::{
    Dimension, EntityType, KnowledgeEntity, KnowledgeRelationship, RelationType,
};

/// Entity confidence assigned to analyzer-supplied structured entities.
const TRUSTED_ENTITY_CONFIDENCE: f64 = 0.85;

/// Strength and confidence assigned to analyzer-supplied triples.
const TRUSTED_RELATIONSHIP_STRENGTH: f64 = 0.8;
const TRUSTED_RELATIONSHIP_CONFIDENCE: f64 = 0.8;

/// Maximum evidence snippet length in characters.
const EVIDENCE_MAX_CHARS: usize = 120;

/// Technical-term dictionary: (keyword, category).
const TECHNICAL_TERMS: &[(&str, &str)] = &[
    ("rust", "language"),
    ("python", "language"),
    ("typescript", "language"),
    ("kubernetes", "platform"),
    ("docker", "platform"),
    ("postgres", "database"),
    ("redis", "database"),
    ("kafka", "messaging"),
    ("grpc", "protocol"),
    ("websocket", "protocol"),
    ("caching", "technique"),
    ("sharding", "technique"),
    ("embedding", "technique"),
    ("vector index", "storage"),
    ("observability", "practice"),
    ("microservices", "architecture"),
];

/// Project-term dictionary: (keyword, category).
const PROJECT_TERMS: &[(&str, &str)] = &[
    ("caching layer", "component"),
    ("payment service", "service"),
    ("search service", "service"),
    ("data pipeline", "pipeline"),
    ("deployment", "release"),
    ("release", "release"),
    ("migration", "initiative"),
    ("prototype", "initiative"),
];

/// Concept-term dictionary: (keyword, category).
const CONCEPT_TERMS: &[(&str, &str)] = &[
    ("latency", "performance"),
    ("throughput", "performance"),
    ("scalability", "architecture"),
    ("reliability", "architecture"),
    ("consistency", "architecture"),
    ("availability", "architecture"),
    ("performance", "performance"),
    ("security", "architecture"),
];

/// Problem-term dictionary: (keyword, category).
const PROBLEM_TERMS: &[(&str, &str)] = &[
    ("bug", "defect"),
    ("outage", "incident"),
    ("regression", "defect"),
    ("bottleneck", "performance"),
    ("memory leak", "defect"),
    ("data loss", "incident"),
    ("downtime", "incident"),
    ("crash", "defect"),
];

/// Person-term dictionary: (keyword, category).
const PERSON_TERMS: &[(&str, &str)] = &[
    ("engineer", "role"),
    ("designer", "role"),
    ("manager", "role"),
    ("customer", "role"),
    ("reviewer", "role"),
    ("on-call", "role"),
];

/// Fixed adjacency table for USES relations: a platform entity uses each of
/// its listed technology entities when both are present.
const TECH_USES: &[(&str, &[&str])] = &[
    ("kubernetes", &["docker"]),
    ("caching layer", &["redis", "caching"]),
    ("data pipeline", &["kafka", "postgres"]),
    ("search service", &["vector index", "embedding"]),
];

/// Keywords signalling that a problem entity was addressed.
const SOLVING_KEYWORDS: &[&str] = &[
    "solved",
    "fixed",
    "resolved",
    "optimized",
    "mitigated",
    "eliminated",
    "解决",
    "修复",
    "优化",
];

/// Derives a deduplicated entity set and a filtered relationship set from
/// analyzed content.
pub struct KnowledgeExtractor {
    config: ExtractionConfig,
}

impl KnowledgeExtractor {
    /// Creates a new extractor with the given gates and feature flag.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract entities and relationships for one storage request.
    ///
    /// Selection between the trust tier and the rule tier follows
    /// `extraction.trust_llm_extraction`; a malformed structured extraction
    /// silently falls back to the rules rather than failing the call.
    pub fn extract(
        &self,
        analysis: &AnalysisResult,
        content: &str,
        attribution: &Attribution,
        record_id: &RecordId,
    ) -> (Vec<KnowledgeEntity>, Vec<KnowledgeRelationship>) {
        let trusted = if self.config.trust_llm_extraction {
            analysis
                .extraction
                .as_ref()
                .and_then(|extraction| self.from_structured(extraction, attribution, record_id))
        } else {
            None
        };

        let (entities, relationships) = match trusted {
            Some(pair) => pair,
            None => self.from_rules(analysis, content, attribution, record_id),
        };

        let entities = self.dedup_entities(entities);
        let relationships = self.filter_relationships(relationships, &entities);
        debug!(
            entities = entities.len(),
            relationships = relationships.len(),
            "knowledge extraction complete"
        );
        (entities, relationships)
    }

    /// Trust tier: parse the analyzer's structured triples directly.
    ///
    /// Returns `None` when the structured extraction is unusable, which
    /// sends the call down the rule tier.
    fn from_structured(
        &self,
        extraction: &LlmExtraction,
        attribution: &Attribution,
        record_id: &RecordId,
    ) -> Option<(Vec<KnowledgeEntity>, Vec<KnowledgeRelationship>)> {
        let entities: Vec<KnowledgeEntity> = extraction
            .entities
            .iter()
            .filter(|e| !e.name.trim().is_empty())
            .map(|e| KnowledgeEntity {
                name: e.name.trim().to_string(),
                entity_type: EntityType::from_str_value(&e.entity_type),
                category: e.entity_type.to_lowercase(),
                confidence: TRUSTED_ENTITY_CONFIDENCE,
                dimension: Dimension::CoreIntent,
                keywords: e.name.trim().to_lowercase(),
                record_id: record_id.0.clone(),
                session_id: attribution.session_id.clone(),
                user_id: attribution.user_id.clone(),
            })
            .collect();

        if entities.is_empty() {
            warn!("structured extraction carried no usable entities, falling back to rules");
            return None;
        }

        let relationships = extraction
            .relationships
            .iter()
            .filter(|t| !t.source.trim().is_empty() && !t.target.trim().is_empty())
            .map(|t| KnowledgeRelationship {
                source: t.source.trim().to_string(),
                target: t.target.trim().to_string(),
                relation: RelationType::from_str_value(&t.relation),
                strength: TRUSTED_RELATIONSHIP_STRENGTH,
                confidence: TRUSTED_RELATIONSHIP_CONFIDENCE,
                evidence: "analyzer-supplied triple".to_string(),
            })
            .collect();

        Some((entities, relationships))
    }

    /// Rule tier: keyword matching over the three analysis-text dimensions,
    /// then the four relationship rule families over the matched entities.
    fn from_rules(
        &self,
        analysis: &AnalysisResult,
        content: &str,
        attribution: &Attribution,
        record_id: &RecordId,
    ) -> (Vec<KnowledgeEntity>, Vec<KnowledgeRelationship>) {
        let entities = match_entities(analysis, attribution, record_id);
        let relationships = self.build_relationships(&entities, content);
        (entities, relationships)
    }

    /// Apply the four relationship rule families over a matched entity set.
    fn build_relationships(
        &self,
        entities: &[KnowledgeEntity],
        content: &str,
    ) -> Vec<KnowledgeRelationship> {
        let lower = content.to_lowercase();
        let unique = unique_view(entities);
        let mut relationships = Vec::new();
        let mut seen: HashSet<(String, String, RelationType)> = HashSet::new();
        let mut push = |relationships: &mut Vec<KnowledgeRelationship>,
                        rel: KnowledgeRelationship| {
            if seen.insert((rel.source.clone(), rel.target.clone(), rel.relation)) {
                relationships.push(rel);
            }
        };

        // (i) USES from the fixed adjacency table.
        let names: HashSet<&str> = unique.iter().map(|e| e.name.as_str()).collect();
        for (platform, technologies) in TECH_USES {
            if !names.contains(platform) {
                continue;
            }
            for tech in *technologies {
                if names.contains(tech) && platform != tech {
                    push(
                        &mut relationships,
                        KnowledgeRelationship {
                            source: (*platform).to_string(),
                            target: (*tech).to_string(),
                            relation: RelationType::Uses,
                            strength: 0.8,
                            confidence: 0.85,
                            evidence: evidence_for(&lower, platform),
                        },
                    );
                }
            }
        }

        // (ii)-(iv) proximity-gated families.
        let solving = SOLVING_KEYWORDS.iter().find(|k| lower.contains(*k)).copied();
        for i in 0..unique.len() {
            for j in (i + 1)..unique.len() {
                let (a, b) = (unique[i], unique[j]);
                if a.name == b.name {
                    continue;
                }
                let Some(distance) = proximity(&lower, &a.name, &b.name) else {
                    continue;
                };
                if distance > self.config.proximity_window_chars {
                    continue;
                }

                if let Some(rel) = pair_relationship(a, b, solving, &lower) {
                    push(&mut relationships, rel);
                }
            }
        }

        relationships
    }

    /// Group by (name, type), keep the highest-confidence instance, then
    /// apply the confidence and name-length gates.
    fn dedup_entities(&self, entities: Vec<KnowledgeEntity>) -> Vec<KnowledgeEntity> {
        let mut best: HashMap<(String, EntityType), KnowledgeEntity> = HashMap::new();
        for entity in entities {
            let key = (entity.name.clone(), entity.entity_type);
            match best.get(&key) {
                Some(existing) if existing.confidence >= entity.confidence => {}
                _ => {
                    best.insert(key, entity);
                }
            }
        }

        let mut survivors: Vec<KnowledgeEntity> = best
            .into_values()
            .filter(|e| {
                e.confidence >= self.config.entity_min_confidence
                    && e.name.chars().count() <= self.config.entity_max_name_len
            })
            .collect();
        survivors.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.entity_type.as_str().cmp(b.entity_type.as_str()))
        });
        survivors
    }

    /// Apply the confidence/strength gates and drop relationships whose
    /// endpoints did not survive entity gating. Relationships require at
    /// least two surviving entities to exist at all.
    fn filter_relationships(
        &self,
        relationships: Vec<KnowledgeRelationship>,
        entities: &[KnowledgeEntity],
    ) -> Vec<KnowledgeRelationship> {
        if entities.len() < 2 {
            return Vec::new();
        }
        let names: HashSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        relationships
            .into_iter()
            .filter(|r| {
                r.confidence >= self.config.relationship_min_confidence
                    && r.strength >= self.config.relationship_min_strength
                    && names.contains(r.source.as_str())
                    && names.contains(r.target.as_str())
            })
            .collect()
    }
}

/// Match the five keyword dictionaries against each analysis-text dimension.
fn match_entities(
    analysis: &AnalysisResult,
    attribution: &Attribution,
    record_id: &RecordId,
) -> Vec<KnowledgeEntity> {
    let dictionaries: [(&[(&str, &str)], EntityType); 5] = [
        (TECHNICAL_TERMS, EntityType::Technical),
        (PROJECT_TERMS, EntityType::Project),
        (CONCEPT_TERMS, EntityType::Concept),
        (PROBLEM_TERMS, EntityType::Problem),
        (PERSON_TERMS, EntityType::Person),
    ];

    let mut entities = Vec::new();
    for dimension in Dimension::ALL {
        let text = analysis.dimension_text(dimension.as_str());
        if text.is_empty() {
            continue;
        }
        let lower = text.to_lowercase();
        for (dictionary, entity_type) in dictionaries {
            for (keyword, category) in dictionary {
                if lower.contains(keyword) {
                    entities.push(KnowledgeEntity {
                        name: (*keyword).to_string(),
                        entity_type,
                        category: (*category).to_string(),
                        confidence: match_confidence(keyword, dimension, text),
                        dimension,
                        keywords: (*keyword).to_string(),
                        record_id: record_id.0.clone(),
                        session_id: attribution.session_id.clone(),
                        user_id: attribution.user_id.clone(),
                    });
                }
            }
        }
    }
    entities
}

/// Confidence score for one keyword match.
///
/// 0.7 base + 0.1 exact substring (always true for dictionary hits) + 0.1
/// for keywords longer than 10 chars + per-dimension bonus + 0.05 for
/// source text over 50 chars, capped at 1.0.
fn match_confidence(keyword: &str, dimension: Dimension, source_text: &str) -> f64 {
    let mut confidence: f64 = 0.7 + 0.1;
    if keyword.chars().count() > 10 {
        confidence += 0.1;
    }
    confidence += match dimension {
        Dimension::DomainContext => 0.1,
        Dimension::CoreIntent => 0.05,
        Dimension::Scenario => 0.0,
    };
    if source_text.chars().count() > 50 {
        confidence += 0.05;
    }
    confidence.min(1.0)
}

/// Relationship for one proximate entity pair, by rule family.
fn pair_relationship(
    a: &KnowledgeEntity,
    b: &KnowledgeEntity,
    solving: Option<&str>,
    lower_content: &str,
) -> Option<KnowledgeRelationship> {
    use EntityType::{Concept, Problem, Project, Technical};

    let relationship = |source: &KnowledgeEntity,
                        target: &KnowledgeEntity,
                        relation: RelationType,
                        strength: f64,
                        confidence: f64,
                        evidence: String| {
        KnowledgeRelationship {
            source: source.name.clone(),
            target: target.name.clone(),
            relation,
            strength,
            confidence,
            evidence,
        }
    };

    // (ii) project COMPOSED_OF technical/concept parts.
    let composed = |project: &KnowledgeEntity, part: &KnowledgeEntity| {
        relationship(
            project,
            part,
            RelationType::ComposedOf,
            0.7,
            0.75,
            evidence_for(lower_content, &project.name),
        )
    };
    match (a.entity_type, b.entity_type) {
        (Project, Technical | Concept) => return Some(composed(a, b)),
        (Technical | Concept, Project) => return Some(composed(b, a)),
        _ => {}
    }

    // (iii) SOLVES when a solving keyword is present in the content.
    if let Some(keyword) = solving {
        let solves = |solver: &KnowledgeEntity, problem: &KnowledgeEntity| {
            relationship(
                solver,
                problem,
                RelationType::Solves,
                0.85,
                0.8,
                evidence_for(lower_content, keyword),
            )
        };
        match (a.entity_type, b.entity_type) {
            (Technical | Project, Problem) => return Some(solves(a, b)),
            (Problem, Technical | Project) => return Some(solves(b, a)),
            _ => {}
        }
    }

    // (iv) concept-to-concept RELATED_TO.
    if a.entity_type == Concept && b.entity_type == Concept {
        return Some(relationship(
            a,
            b,
            RelationType::RelatedTo,
            0.6,
            0.7,
            evidence_for(lower_content, &a.name),
        ));
    }

    None
}

/// One instance per (name, type), highest confidence first on ties.
fn unique_view(entities: &[KnowledgeEntity]) -> Vec<&KnowledgeEntity> {
    let mut best: HashMap<(&str, EntityType), &KnowledgeEntity> = HashMap::new();
    for entity in entities {
        let key = (entity.name.as_str(), entity.entity_type);
        match best.get(&key) {
            Some(existing) if existing.confidence >= entity.confidence => {}
            _ => {
                best.insert(key, entity);
            }
        }
    }
    let mut view: Vec<&KnowledgeEntity> = best.into_values().collect();
    view.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.entity_type.as_str().cmp(b.entity_type.as_str()))
    });
    view
}

/// Character-offset distance between the first occurrences of two entity
/// names in the content.
///
/// Crude by design: byte offsets of first occurrences only, so long
/// sentences and near-duplicate names can misfire. Preserved for
/// compatibility with existing stored graphs.
fn proximity(lower_content: &str, a: &str, b: &str) -> Option<usize> {
    let pos_a = lower_content.find(&a.to_lowercase())?;
    let pos_b = lower_content.find(&b.to_lowercase())?;
    Some(pos_a.abs_diff(pos_b))
}

/// Evidence snippet around the first occurrence of `anchor` in the content.
fn evidence_for(lower_content: &str, anchor: &str) -> String {
    match lower_content.find(&anchor.to_lowercase()) {
        Some(offset) => snippet_around(lower_content, offset, EVIDENCE_MAX_CHARS),
        None => anchor.chars().take(EVIDENCE_MAX_CHARS).collect(),
    }
}

/// Up to `max_chars` characters centered on a byte offset, on char boundaries.
fn snippet_around(text: &str, byte_offset: usize, max_chars: usize) -> String {
    let half = max_chars / 2;
    let mut start = byte_offset.min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let before: String = text[..start]
        .chars()
        .rev()
        .take(half)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let after: String = text[start..].chars().take(half).collect();
    format!("{before}{after}")
}
