//! One page of datagrid results

use serde::Serialize;

/// A page of results plus the metadata needed to render pagination links
///
/// Pages are 1-indexed. A `max_per_page` of zero means "no pagination": the
/// pager then holds every row on a single page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pager<T> {
	results: Vec<T>,
	page: usize,
	max_per_page: usize,
	total: usize,
}

impl<T> Pager<T> {
	/// Create a pager
	///
	/// The page is kept within `1..=last_page`.
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_query::Pager;
	///
	/// let pager = Pager::new(vec!["k", "l"], 2, 10, 12);
	/// assert_eq!(pager.page(), 2);
	/// assert_eq!(pager.last_page(), 2);
	/// assert_eq!(pager.first_index(), 11);
	/// assert_eq!(pager.last_index(), 12);
	/// ```
	pub fn new(results: Vec<T>, page: usize, max_per_page: usize, total: usize) -> Self {
		Self {
			results,
			page: page.clamp(1, last_page(total, max_per_page)),
			max_per_page,
			total,
		}
	}

	/// Rows on this page
	pub fn results(&self) -> &[T] {
		&self.results
	}

	/// Consume the pager, returning its rows
	pub fn into_results(self) -> Vec<T> {
		self.results
	}

	/// Current page number
	pub fn page(&self) -> usize {
		self.page
	}

	/// Rows per page
	pub fn max_per_page(&self) -> usize {
		self.max_per_page
	}

	/// Number of rows across all pages
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of rows on this page
	pub fn len(&self) -> usize {
		self.results.len()
	}

	/// Whether this page holds no rows
	pub fn is_empty(&self) -> bool {
		self.results.is_empty()
	}

	/// Number of the last page, at least 1
	pub fn last_page(&self) -> usize {
		last_page(self.total, self.max_per_page)
	}

	/// Whether the rows span more than one page
	pub fn have_to_paginate(&self) -> bool {
		self.max_per_page > 0 && self.total > self.max_per_page
	}

	/// Whether this is the first page
	pub fn is_first_page(&self) -> bool {
		self.page == 1
	}

	/// Whether this is the last page
	pub fn is_last_page(&self) -> bool {
		self.page >= self.last_page()
	}

	/// Always 1
	pub fn first_page(&self) -> usize {
		1
	}

	/// Following page number, or the last page
	pub fn next_page(&self) -> usize {
		(self.page + 1).min(self.last_page())
	}

	/// Preceding page number, or the first page
	pub fn previous_page(&self) -> usize {
		self.page.saturating_sub(1).max(1)
	}

	/// 1-based index of the first row on this page, 0 when there are no rows
	pub fn first_index(&self) -> usize {
		if self.total == 0 {
			0
		} else if self.max_per_page == 0 {
			1
		} else {
			(self.page - 1) * self.max_per_page + 1
		}
	}

	/// 1-based index of the last row on this page, 0 when there are no rows
	pub fn last_index(&self) -> usize {
		if self.max_per_page == 0 {
			return self.total;
		}
		(self.page * self.max_per_page).min(self.total)
	}

	/// Up to `count` page numbers centred on the current page
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_query::Pager;
	///
	/// let pager: Pager<()> = Pager::new(vec![], 6, 10, 200);
	/// assert_eq!(pager.links(5), vec![4, 5, 6, 7, 8]);
	///
	/// let near_end: Pager<()> = Pager::new(vec![], 20, 10, 200);
	/// assert_eq!(near_end.links(5), vec![16, 17, 18, 19, 20]);
	///
	/// let short: Pager<()> = Pager::new(vec![], 1, 10, 25);
	/// assert_eq!(short.links(5), vec![1, 2, 3]);
	/// ```
	pub fn links(&self, count: usize) -> Vec<usize> {
		let last = self.last_page();
		let centred = self.page.saturating_sub(count / 2).max(1);
		let latest_start = (last + 1).saturating_sub(count).max(1);
		let begin = centred.min(latest_start);

		(begin..begin.saturating_add(count)).take_while(|&page| page <= last).collect()
	}

	/// Iterate over the rows of this page
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.results.iter()
	}
}

impl<'a, T> IntoIterator for &'a Pager<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.results.iter()
	}
}

impl<T> IntoIterator for Pager<T> {
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.results.into_iter()
	}
}

/// Last page number for `total` rows split into pages of `max_per_page`
pub(crate) fn last_page(total: usize, max_per_page: usize) -> usize {
	if max_per_page == 0 {
		1
	} else {
		total.div_ceil(max_per_page).max(1)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, 10, 1)]
	#[case(10, 10, 1)]
	#[case(11, 10, 2)]
	#[case(95, 30, 4)]
	#[case(95, 0, 1)]
	fn test_last_page(#[case] total: usize, #[case] per_page: usize, #[case] expected: usize) {
		assert_eq!(last_page(total, per_page), expected);
	}

	#[rstest]
	fn test_empty_pager() {
		let pager: Pager<u8> = Pager::new(vec![], 1, 30, 0);
		assert!(pager.is_first_page());
		assert!(pager.is_last_page());
		assert!(!pager.have_to_paginate());
		assert_eq!(pager.first_index(), 0);
		assert_eq!(pager.last_index(), 0);
		assert_eq!(pager.next_page(), 1);
		assert_eq!(pager.links(5), vec![1]);
	}

	#[rstest]
	fn test_middle_page_navigation() {
		let pager = Pager::new(vec![4, 5, 6], 2, 3, 10);
		assert!(pager.have_to_paginate());
		assert!(!pager.is_first_page());
		assert!(!pager.is_last_page());
		assert_eq!(pager.previous_page(), 1);
		assert_eq!(pager.next_page(), 3);
		assert_eq!(pager.last_page(), 4);
		assert_eq!((pager.first_index(), pager.last_index()), (4, 6));
		assert_eq!(pager.iter().sum::<i32>(), 15);
	}

	#[rstest]
	fn test_unpaginated_pager() {
		let pager = Pager::new(vec![1, 2, 3], 1, 0, 3);
		assert!(!pager.have_to_paginate());
		assert_eq!(pager.last_page(), 1);
		assert_eq!((pager.first_index(), pager.last_index()), (1, 3));
	}

	#[rstest]
	fn test_page_zero_is_raised_to_one() {
		let pager: Pager<()> = Pager::new(vec![], 0, 10, 5);
		assert_eq!(pager.page(), 1);
	}

	#[rstest]
	fn test_page_past_the_end_is_capped() {
		let pager: Pager<()> = Pager::new(vec![], 9, 10, 25);
		assert_eq!(pager.page(), 3);
		assert!(pager.is_last_page());
		assert_eq!((pager.first_index(), pager.last_index()), (21, 25));
	}

	#[rstest]
	fn test_links_with_huge_count_stop_at_last_page() {
		let pager: Pager<()> = Pager::new(vec![], 2, 10, 40);
		assert_eq!(pager.links(usize::MAX), vec![1, 2, 3, 4]);
	}
}
