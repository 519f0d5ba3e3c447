//! Integration tests for planned, faceted searches and the session loop.

use std::cell::RefCell;
use std::io::Cursor;

use chrono::NaiveDate;
use proptest::prelude::*;

use usersearch::cli::{ResultRenderer, Session};
use usersearch::prelude::*;

fn user(id: u64, first: &str, last: &str, gender: Gender, age: u32) -> UserRecord {
    let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
    UserRecord {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        gender,
        birth_date: date("1990-01-01"),
        age,
        created_at: date("2019-05-01"),
        last_online_at: date("2020-04-01"),
    }
}

fn seeded_index() -> Result<MemoryIndex> {
    let records = vec![
        user(1000, "Jane", "Doe", Gender::Female, 30),
        user(1001, "John", "Doe", Gender::Male, 45),
        user(1002, "Mary", "Smith", Gender::Female, 17),
        user(1003, "Peter", "Jones", Gender::Male, 70),
        user(1004, "Linda", "Brown", Gender::Female, 52),
        user(1005, "Karen", "White", Gender::Female, 22),
    ];
    let mut index = MemoryIndex::new();
    BatchLoader::new(4)?.load(&mut index, &records)?;
    Ok(index)
}

#[test]
fn test_gender_query_renders_typed_row() -> Result<()> {
    let index = seeded_index()?;
    let request = QueryPlanner::new().plan("gender:female")?;
    let result = index.search(&request)?;

    assert_eq!(result.total_hits, 4);
    assert_eq!(result.hits.len(), 4);

    let jane = result
        .hits
        .iter()
        .find(|hit| hit.id == "1000")
        .expect("female record aged 30 is returned");
    let row = request.projection().row(jane)?;
    assert_eq!(row[3].and_then(|v| v.as_integer()), Some(30));
    assert!(row[1].and_then(|v| v.as_text()).is_some_and(|s| !s.is_empty()));
    assert!(row[2].and_then(|v| v.as_text()).is_some_and(|s| !s.is_empty()));

    let mut out = Vec::new();
    ResultRenderer::new(QueryPlanner::projection()).render(&result, &mut out)?;
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("| 1000 | Jane       | Doe       |  30 |"));

    Ok(())
}

#[test]
fn test_facets_are_computed_over_all_matches() -> Result<()> {
    let index = seeded_index()?;
    let request = QueryPlanner::new().plan("-gender:nobody")?;
    let result = index.search(&request)?;

    assert_eq!(result.hits.len(), 5);
    assert_eq!(result.total_hits, 6);

    let gender = &result.facets["gender"];
    assert_eq!(gender.terms[0].term, "female");
    assert_eq!(gender.terms[0].count, 4);
    assert_eq!(gender.terms[1].count, 2);

    let counts: Vec<(&str, u64)> = result.facets["age_group"]
        .ranges
        .iter()
        .map(|r| (r.label.as_str(), r.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("teenager", 1),
            ("young-adult", 1),
            ("adult", 1),
            ("senior-adult", 2),
            ("senior", 1),
        ]
    );

    Ok(())
}

#[test]
fn test_required_clauses_and_ranges() -> Result<()> {
    let index = seeded_index()?;
    let result = index.search(&QueryPlanner::new().plan("+ gender:female + age:>=45")?)?;

    let ids: Vec<&str> = result.hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["1004"]);

    Ok(())
}

/// Index double counting the search calls it receives.
#[derive(Default)]
struct CountingIndex {
    requests: RefCell<Vec<SearchRequest>>,
}

impl SearchIndex for CountingIndex {
    fn submit(&mut self, _batch: Batch) -> Result<()> {
        Ok(())
    }

    fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        self.requests.borrow_mut().push(request.clone());
        Ok(SearchResult::empty())
    }

    fn doc_count(&self) -> u64 {
        0
    }
}

fn run_session(index: &CountingIndex, input: &str) -> Result<String> {
    let mut out = Vec::new();
    Session::new(
        index,
        QueryPlanner::new(),
        ResultRenderer::new(QueryPlanner::projection()),
    )
    .run(Cursor::new(input.to_string()), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_exit_token_issues_no_search() -> Result<()> {
    let index = CountingIndex::default();
    let out = run_session(&index, "exit\nignored\n")?;

    assert!(index.requests.borrow().is_empty());
    assert!(out.contains("Goodbye!"));

    Ok(())
}

proptest! {
    /// Every age falls into exactly one bucket.
    #[test]
    fn prop_age_groups_partition_the_real_line(age in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let facet = QueryPlanner::age_groups().unwrap();

        let matching = facet.ranges().iter().filter(|r| r.contains(age)).count();
        prop_assert_eq!(matching, 1);
    }

    /// Any line other than the exit token issues exactly one first-page
    /// search with both facets.
    #[test]
    fn prop_any_other_line_issues_one_search(line in "[^\r\n]{0,40}") {
        prop_assume!(line != "exit");
        let index = CountingIndex::default();

        run_session(&index, &format!("{line}\n")).unwrap();

        let requests = index.requests.borrow();
        prop_assert_eq!(requests.len(), 1);
        prop_assert_eq!(requests[0].query(), line.as_str());
        prop_assert_eq!(requests[0].offset(), 0);
        prop_assert_eq!(requests[0].size(), 5);
        let facets: Vec<&str> = requests[0].facets().keys().map(String::as_str).collect();
        prop_assert_eq!(facets, vec!["age_group", "gender"]);
    }
}
