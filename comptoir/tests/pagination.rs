//! Pagination properties over random receipts

use comptoir::printing::{Block, LayoutError, Page, paginate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::models::PageGeometry;

fn block(tag: &str, n: usize) -> Block {
    Block::new((0..n).map(|i| format!("{tag}.{i}")).collect())
}

struct Case {
    geometry: PageGeometry,
    header: Block,
    items: Vec<Block>,
    footer: Block,
}

fn random_case(rng: &mut StdRng) -> Case {
    let max_lines = rng.gen_range(10..=100);
    let width = rng.gen_range(20..=80);
    let header_len = rng.gen_range(1..=max_lines / 3);
    let footer_len = rng.gen_range(1..=max_lines / 3);
    let item_count = rng.gen_range(0..=500);
    let items = (0..item_count)
        .map(|i| block(&format!("I{i}"), rng.gen_range(1..=4)))
        .collect();
    Case {
        geometry: PageGeometry::new(width, max_lines).unwrap(),
        header: block("H", header_len),
        items,
        footer: block("F", footer_len),
    }
}

/// Page index and starting line of every item
fn locate_items(pages: &[Page], items: &[Block]) -> Vec<(usize, usize)> {
    items
        .iter()
        .map(|item| {
            let first = &item.lines()[0];
            pages
                .iter()
                .enumerate()
                .find_map(|(p, page)| page.lines().iter().position(|l| l == first).map(|i| (p, i)))
                .unwrap_or_else(|| panic!("{first} missing"))
        })
        .collect()
}

fn check(case: &Case) {
    let max = case.geometry.max_lines();
    let pages = paginate(&case.header, &case.items, &case.footer, &case.geometry).unwrap();
    assert!(!pages.is_empty());

    // capacity: every page is exactly one physical page
    for page in &pages {
        assert_eq!(page.len(), max);
    }

    // completeness and order: non-blank lines read back the input
    let expected: Vec<&String> = case
        .header
        .lines()
        .iter()
        .chain(case.items.iter().flat_map(|b| b.lines()))
        .chain(case.footer.lines())
        .collect();
    let actual: Vec<&String> = pages
        .iter()
        .flat_map(|p| p.lines())
        .filter(|l| !l.is_empty())
        .collect();
    assert_eq!(actual, expected);

    // header once, at the top of page 1
    assert_eq!(&pages[0].lines()[..case.header.len()], case.header.lines());

    // footer once, bottom-anchored on the last page
    let last = pages.last().unwrap();
    assert_eq!(&last.lines()[max - case.footer.len()..], case.footer.lines());

    // atomicity: each item is contiguous on a single page
    let positions = locate_items(&pages, &case.items);
    for (item, &(p, start)) in case.items.iter().zip(&positions) {
        assert!(start + item.len() <= max);
        assert_eq!(&pages[p].lines()[start..start + item.len()], item.lines());
    }

    // dense filling: an item opening a page did not fit on the previous one
    for (i, item) in case.items.iter().enumerate().skip(1) {
        let (page, start) = positions[i];
        let (prev_page, prev_start) = positions[i - 1];
        if page != prev_page {
            let used = prev_start + case.items[i - 1].len();
            assert!(used + item.len() > max, "item {i} could have stayed on page {prev_page}");
            assert_eq!(start, 0);
        }
    }

    // a receipt that fits on one page is printed on one page
    let total: usize = case.header.len()
        + case.items.iter().map(Block::len).sum::<usize>()
        + case.footer.len();
    if total <= max {
        assert_eq!(pages.len(), 1);
    } else {
        assert!(pages.len() >= 2);
    }
}

#[test]
fn pagination_properties_hold_for_random_receipts() {
    let mut rng = StdRng::seed_from_u64(0x5eed_2025);
    for _ in 0..400 {
        check(&random_case(&mut rng));
    }
}

#[test]
fn pagination_properties_hold_for_tight_pages() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let max_lines = rng.gen_range(10..=14);
        let header_len = rng.gen_range(1..=max_lines / 2);
        let footer_len = max_lines - header_len - rng.gen_range(0..=1);
        let items = (0..rng.gen_range(0..=40))
            .map(|i| block(&format!("I{i}"), rng.gen_range(1..=max_lines)))
            .collect();
        check(&Case {
            geometry: PageGeometry::new(32, max_lines).unwrap(),
            header: block("H", header_len),
            items,
            footer: block("F", footer_len),
        });
    }
}

#[test]
fn oversized_item_is_rejected_with_its_index() {
    let geometry = PageGeometry::new(32, 10).unwrap();
    let items = vec![block("I0", 2), block("I1", 11)];
    let err = paginate(&block("H", 2), &items, &block("F", 2), &geometry).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::BlockTooLarge { required: 11, available: 10, .. }
    ));
}

#[test]
fn header_and_footer_taller_than_page_is_rejected() {
    let geometry = PageGeometry::new(32, 10).unwrap();
    let err = paginate(&block("H", 6), &[], &block("F", 5), &geometry).unwrap_err();
    assert_eq!(
        err,
        LayoutError::GeometryTooSmall {
            header: 6,
            footer: 5,
            max_lines: 10
        }
    );
}
