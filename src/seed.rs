//! Fixture questions for development and demos
//!
//! Difficulty labels are derived from a hash of the category and tags, so
//! reseeding always produces the same labels.

use tracing::info;

use crate::db::QuestionStore;
use crate::types::{Difficulty, NewQuestion, Result};

struct Fixture {
    question: &'static str,
    answer: &'static str,
    tags: &'static [&'static str],
}

const FIXTURES: &[(&str, &[Fixture])] = &[
    (
        "Frontend",
        &[
            Fixture {
                question: "What problem do React hooks solve?",
                answer: "Hooks let function components hold state and run side effects, so stateful logic can be shared without class components or higher-order wrappers.",
                tags: &["React", "Hooks"],
            },
            Fixture {
                question: "What is the virtual DOM?",
                answer: "An in-memory tree of UI nodes. The framework diffs the new tree against the previous one and applies only the minimal set of real DOM mutations.",
                tags: &["React", "DOM", "Performance"],
            },
            Fixture {
                question: "How does CSS specificity decide which rule wins?",
                answer: "Inline styles beat ids, ids beat classes, attributes and pseudo-classes, which beat element selectors. Ties go to the rule declared last.",
                tags: &["CSS"],
            },
        ],
    ),
    (
        "Backend",
        &[
            Fixture {
                question: "When would you pick GraphQL over REST?",
                answer: "When clients need to shape their own responses across many related resources. REST stays simpler to cache and reason about for resource-oriented APIs.",
                tags: &["REST", "GraphQL"],
            },
            Fixture {
                question: "What makes an HTTP method idempotent?",
                answer: "Repeating the request has the same effect on server state as sending it once. GET, PUT and DELETE are idempotent; POST is not.",
                tags: &["HTTP", "REST"],
            },
            Fixture {
                question: "What is connection pooling?",
                answer: "Keeping a set of open connections to a database or service and reusing them across requests instead of paying the handshake cost every time.",
                tags: &["Performance", "Databases"],
            },
        ],
    ),
    (
        "Data Structures",
        &[
            Fixture {
                question: "How does a hash table resolve collisions?",
                answer: "Either by chaining entries that share a bucket in a list, or by open addressing, which probes other buckets until a free slot is found.",
                tags: &["Hash Table"],
            },
            Fixture {
                question: "When is a linked list preferable to a dynamic array?",
                answer: "When elements are frequently inserted or removed in the middle and a cursor to the position is already held. Arrays win for indexed access and cache locality.",
                tags: &["LinkedList", "Array", "Time Complexity"],
            },
            Fixture {
                question: "What is a Bloom filter?",
                answer: "A compact probabilistic set that answers membership queries with no false negatives and a tunable false positive rate.",
                tags: &["Bloom Filter", "Probabilistic"],
            },
        ],
    ),
    (
        "Algorithms",
        &[
            Fixture {
                question: "How do BFS and DFS differ?",
                answer: "BFS explores a graph level by level using a queue and finds shortest paths in unweighted graphs. DFS follows one branch as deep as possible using a stack or recursion.",
                tags: &["BFS", "DFS", "Graph Traversal"],
            },
            Fixture {
                question: "What is the worst case of quicksort?",
                answer: "O(n^2), when every pivot is the smallest or largest remaining element. Randomized or median-of-three pivots make it unlikely.",
                tags: &["Quicksort", "Sorting", "Time Complexity"],
            },
            Fixture {
                question: "What is dynamic programming?",
                answer: "Solving a problem by combining solutions to overlapping subproblems, storing each subproblem's answer so it is computed only once.",
                tags: &["Dynamic Programming"],
            },
        ],
    ),
    (
        "System Design",
        &[
            Fixture {
                question: "What trade-offs come with microservices?",
                answer: "Independent deployment and scaling per service, paid for with network calls between services, distributed failure modes and more operational tooling.",
                tags: &["Microservices", "Architecture"],
            },
            Fixture {
                question: "How does a CDN reduce latency?",
                answer: "It serves cached content from edge locations close to the user, so requests avoid the round trip to the origin server.",
                tags: &["CDN", "Caching"],
            },
            Fixture {
                question: "What does the CAP theorem state?",
                answer: "During a network partition a distributed store must choose between consistency and availability.",
                tags: &["Distributed Systems", "CAP"],
            },
        ],
    ),
    (
        "Databases",
        &[
            Fixture {
                question: "What does an index cost?",
                answer: "Extra storage and slower writes, since every insert or update must also maintain the index structure.",
                tags: &["Indexing", "Performance"],
            },
            Fixture {
                question: "What are the ACID properties?",
                answer: "Atomicity, consistency, isolation and durability: the guarantees a transactional database gives for each transaction.",
                tags: &["Transactions", "ACID"],
            },
            Fixture {
                question: "When is denormalization worth it?",
                answer: "When read performance matters more than write simplicity and the duplicated data can be kept consistent by the application or by batch jobs.",
                tags: &["Schema Design", "NoSQL"],
            },
        ],
    ),
];

/// Deterministic cosmetic difficulty for a question
///
/// Hashes `category` followed by the concatenated tags as UTF-16 code units
/// (`h = h * 31 + unit`, wrapping at 32 bits) and indexes Easy/Medium/Hard
/// with `|h| mod 3`.
pub fn difficulty_for<S: AsRef<str>>(category: &str, tags: &[S]) -> Difficulty {
    let mut hash: i32 = 0;
    let units = category
        .encode_utf16()
        .chain(tags.iter().flat_map(|t| t.as_ref().encode_utf16()));
    for unit in units {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }

    let index = (i64::from(hash).abs() % 3) as usize;
    Difficulty::ALL[index]
}

/// Every fixture question, labelled
pub fn fixture_questions() -> Vec<NewQuestion> {
    FIXTURES
        .iter()
        .flat_map(|(category, fixtures)| {
            fixtures.iter().map(move |f| NewQuestion {
                question: f.question.to_string(),
                answer: f.answer.to_string(),
                category: category.to_string(),
                tags: f.tags.iter().map(|t| t.to_string()).collect(),
                difficulty: Some(difficulty_for(category, f.tags)),
            })
        })
        .collect()
}

/// Replace the store's contents with the fixtures
pub async fn seed_store(store: &dyn QuestionStore) -> Result<usize> {
    let questions = fixture_questions();
    let inserted = store.replace_all(questions).await?;
    info!(
        inserted = inserted,
        categories = FIXTURES.len(),
        backend = store.backend(),
        "Seeded question store"
    );
    Ok(inserted)
}
