//! Knowledge base command implementations (match, knowledge)

use anyhow::Result;
use expn_core::{KnowledgeBase, MatchPolicy, Matcher};

/// Look a query up in the knowledge base, returning the matched answer
pub fn cmd_match(
    knowledge: &KnowledgeBase,
    policy: MatchPolicy,
    query: &str,
) -> Result<Option<String>> {
    let matcher = Matcher::new(knowledge, policy);

    match matcher.find(query) {
        Some(found) => {
            println!("✅ Matched ({}, score {:.2})", policy, found.score);
            println!("   Q: {}", found.question);
            println!("   A: {}", found.answer);
            Ok(Some(found.answer.to_string()))
        }
        None => {
            println!("no match ({})", policy);
            Ok(None)
        }
    }
}

/// List knowledge base entries in match order
pub fn cmd_knowledge(knowledge: &KnowledgeBase) -> Result<()> {
    println!("Knowledge Base ({} entries):\n", knowledge.len());

    for (i, entry) in knowledge.entries().iter().enumerate() {
        println!("{:>3}. {}", i + 1, entry.question);
        println!("     {}", entry.answer);
    }

    println!();
    match knowledge.source() {
        Some(path) => println!("Source: {}", path.display()),
        None => println!("Source: built-in"),
    }

    Ok(())
}
