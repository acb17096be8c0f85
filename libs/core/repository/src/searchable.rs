use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::contracts::{Repository, SearchableRepository};
use crate::entity::Entity;
use crate::error::RepositoryResult;
use crate::in_memory::InMemoryRepository;
use crate::search::{SearchParams, SearchResult, SortDirection};

/// Domain predicate deciding whether an entity matches a filter string
pub type FilterFn<P> = Arc<dyn Fn(&Entity<P>, &str) -> bool + Send + Sync>;

/// Comparable value of a named field
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
}

impl SortKey {
    /// Total order over keys.
    ///
    /// NaN sorts after every other float. Keys of different kinds order by
    /// variant.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Integer(a), SortKey::Integer(b)) => a.cmp(b),
            (SortKey::Float(a), SortKey::Float(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.total_cmp(b),
            },
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Text(_) => 0,
            SortKey::Integer(_) => 1,
            SortKey::Float(_) => 2,
            SortKey::Timestamp(_) => 3,
        }
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        SortKey::Text(value.to_string())
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        SortKey::Text(value)
    }
}

impl From<i64> for SortKey {
    fn from(value: i64) -> Self {
        SortKey::Integer(value)
    }
}

impl From<i32> for SortKey {
    fn from(value: i32) -> Self {
        SortKey::Integer(value.into())
    }
}

impl From<f64> for SortKey {
    fn from(value: f64) -> Self {
        SortKey::Float(value)
    }
}

impl From<DateTime<Utc>> for SortKey {
    fn from(value: DateTime<Utc>) -> Self {
        SortKey::Timestamp(value)
    }
}

/// Property bags that expose their fields by name for sorting
pub trait Sortable {
    /// `None` when the bag has no such field
    fn sort_key(&self, field: &str) -> Option<SortKey>;
}

fn compare_keys(a: Option<SortKey>, b: Option<SortKey>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(&b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

/// In-memory repository with a filter → sort → paginate search pipeline.
///
/// The only domain-specific parts are the filter predicate and the list of
/// sortable fields, both supplied at construction.
pub struct InMemorySearchableRepository<P> {
    store: InMemoryRepository<P>,
    filter: FilterFn<P>,
    sortable_fields: Vec<String>,
    default_sort: Option<(String, SortDirection)>,
}

impl<P> InMemorySearchableRepository<P> {
    pub fn new<F, I, S>(filter: F, sortable_fields: I) -> Self
    where
        F: Fn(&Entity<P>, &str) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store: InMemoryRepository::new(),
            filter: Arc::new(filter),
            sortable_fields: sortable_fields.into_iter().map(Into::into).collect(),
            default_sort: None,
        }
    }

    /// Ordering used when a search carries no sort field.
    ///
    /// The field still has to be in the sortable list. The search result
    /// keeps echoing `sort: None`.
    pub fn with_default_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort = Some((field.into(), direction));
        self
    }

    /// Underlying CRUD store
    pub fn store(&self) -> &InMemoryRepository<P> {
        &self.store
    }

    /// Keep only the items matching `filter`; `None` keeps everything
    pub fn apply_filter(&self, items: Vec<Entity<P>>, filter: Option<&str>) -> Vec<Entity<P>> {
        match filter {
            None => items,
            Some(filter) => items
                .into_iter()
                .filter(|item| (self.filter)(item, filter))
                .collect(),
        }
    }

    /// Paginate a sequence: the slice `[(page - 1) * per_page, page * per_page)`.
    ///
    /// Pages past the end are empty.
    pub fn apply_paginate(items: Vec<Entity<P>>, page: usize, per_page: usize) -> Vec<Entity<P>> {
        let start = page.saturating_sub(1).saturating_mul(per_page);
        items.into_iter().skip(start).take(per_page).collect()
    }

    fn is_sortable(&self, field: &str) -> bool {
        self.sortable_fields.iter().any(|f| f == field)
    }
}

impl<P: Sortable> InMemorySearchableRepository<P> {
    /// Stable sort on `sort`, descending unless `direction` is `Asc`.
    ///
    /// Missing or non-sortable fields leave the order untouched.
    pub fn apply_sort(
        &self,
        mut items: Vec<Entity<P>>,
        sort: Option<&str>,
        direction: Option<SortDirection>,
    ) -> Vec<Entity<P>> {
        let Some(field) = sort.filter(|field| self.is_sortable(field)) else {
            return items;
        };
        let ascending = direction.is_some_and(|d| d.is_ascending());

        items.sort_by(|a, b| {
            let ordering = compare_keys(a.props().sort_key(field), b.props().sort_key(field));
            if ascending { ordering } else { ordering.reverse() }
        });
        items
    }
}

impl<P> Clone for InMemorySearchableRepository<P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            filter: Arc::clone(&self.filter),
            sortable_fields: self.sortable_fields.clone(),
            default_sort: self.default_sort.clone(),
        }
    }
}

impl<P> fmt::Debug for InMemorySearchableRepository<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemorySearchableRepository")
            .field("sortable_fields", &self.sortable_fields)
            .field("default_sort", &self.default_sort)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<P> Repository<P> for InMemorySearchableRepository<P>
where
    P: Clone + Send + Sync + 'static,
{
    async fn insert(&self, entity: Entity<P>) -> RepositoryResult<()> {
        self.store.insert(entity).await
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Entity<P>> {
        self.store.find_by_id(id).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Entity<P>>> {
        self.store.find_all().await
    }

    async fn update(&self, entity: Entity<P>) -> RepositoryResult<()> {
        self.store.update(entity).await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}

#[async_trait]
impl<P> SearchableRepository<P> for InMemorySearchableRepository<P>
where
    P: Sortable + Clone + Send + Sync + 'static,
{
    fn sortable_fields(&self) -> &[String] {
        &self.sortable_fields
    }

    async fn search(&self, params: SearchParams) -> RepositoryResult<SearchResult<Entity<P>>> {
        let items = self.store.find_all().await?;

        let filtered = self.apply_filter(items, params.filter());
        let total = filtered.len();

        let sorted = match (params.sort(), &self.default_sort) {
            (Some(sort), _) => self.apply_sort(filtered, Some(sort), params.sort_direction()),
            (None, Some((field, direction))) => {
                self.apply_sort(filtered, Some(field.as_str()), Some(*direction))
            }
            (None, None) => filtered,
        };

        let page = Self::apply_paginate(sorted, params.page(), params.per_page());

        tracing::debug!(
            total,
            page = params.page(),
            per_page = params.per_page(),
            returned = page.len(),
            "Searched in-memory repository"
        );
        Ok(SearchResult::new(page, total, &params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{DEFAULT_PER_PAGE, SearchInput};

    #[derive(Debug, Clone, PartialEq)]
    struct StubProps {
        name: String,
        price: i64,
    }

    impl Sortable for StubProps {
        fn sort_key(&self, field: &str) -> Option<SortKey> {
            match field {
                "name" => Some(self.name.as_str().into()),
                "price" => Some(self.price.into()),
                _ => None,
            }
        }
    }

    type StubRepository = InMemorySearchableRepository<StubProps>;

    fn stub(name: &str, price: i64) -> Entity<StubProps> {
        Entity::new(
            StubProps {
                name: name.to_string(),
                price,
            },
            None,
        )
    }

    fn repository() -> StubRepository {
        InMemorySearchableRepository::new(
            |item: &Entity<StubProps>, filter: &str| {
                item.props()
                    .name
                    .to_lowercase()
                    .contains(&filter.to_lowercase())
            },
            ["name"],
        )
    }

    async fn seeded(items: &[Entity<StubProps>]) -> StubRepository {
        let repo = repository();
        repo.store().replace_all(items.to_vec()).await;
        repo
    }

    fn pick(items: &[Entity<StubProps>], indexes: &[usize]) -> Vec<Entity<StubProps>> {
        indexes.iter().map(|&i| items[i].clone()).collect()
    }

    fn names(items: &[Entity<StubProps>]) -> Vec<&str> {
        items.iter().map(|item| item.props().name.as_str()).collect()
    }

    #[test]
    fn test_apply_filter_without_filter_returns_items() {
        let repo = repository();
        let items = vec![stub("name value", 50)];

        assert_eq!(repo.apply_filter(items.clone(), None), items);
    }

    #[test]
    fn test_apply_filter_is_case_insensitive_substring() {
        let repo = repository();
        let items = vec![stub("test", 50), stub("TEST", 90), stub("fake", 150)];

        let filtered = repo.apply_filter(items.clone(), Some("TEST"));
        assert_eq!(filtered, pick(&items, &[0, 1]));

        let filtered = repo.apply_filter(items.clone(), Some("Test"));
        assert_eq!(filtered, pick(&items, &[0, 1]));

        let filtered = repo.apply_filter(items, Some("no-filter"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_apply_sort_ignores_missing_or_unlisted_fields() {
        let repo = repository();
        let items = vec![stub("b", 50), stub("a", 90)];

        assert_eq!(repo.apply_sort(items.clone(), None, None), items);
        assert_eq!(
            repo.apply_sort(items.clone(), Some("price"), Some(SortDirection::Asc)),
            items
        );
        assert_eq!(
            repo.apply_sort(items.clone(), Some("unknown"), Some(SortDirection::Asc)),
            items
        );
    }

    #[test]
    fn test_apply_sort_orders_by_field() {
        let repo = repository();
        let items = vec![stub("b", 50), stub("a", 90), stub("c", 90)];

        let sorted = repo.apply_sort(items.clone(), Some("name"), Some(SortDirection::Asc));
        assert_eq!(sorted, pick(&items, &[1, 0, 2]));

        let sorted = repo.apply_sort(items.clone(), Some("name"), Some(SortDirection::Desc));
        assert_eq!(sorted, pick(&items, &[2, 0, 1]));

        let sorted = repo.apply_sort(items.clone(), Some("name"), None);
        assert_eq!(sorted, pick(&items, &[2, 0, 1]));
    }

    #[test]
    fn test_apply_sort_is_stable() {
        let repo = InMemorySearchableRepository::new(|_: &Entity<StubProps>, _: &str| true, ["price"]);
        let items = vec![stub("x", 90), stub("y", 50), stub("z", 90)];

        let sorted = repo.apply_sort(items.clone(), Some("price"), Some(SortDirection::Desc));
        assert_eq!(names(&sorted), vec!["x", "z", "y"]);

        let sorted = repo.apply_sort(items, Some("price"), Some(SortDirection::Asc));
        assert_eq!(names(&sorted), vec!["y", "x", "z"]);
    }

    #[test]
    fn test_apply_paginate() {
        let items = vec![
            stub("a", 50),
            stub("b", 90),
            stub("c", 90),
            stub("d", 90),
            stub("e", 90),
        ];

        let page = StubRepository::apply_paginate(items.clone(), 1, 2);
        assert_eq!(page, pick(&items, &[0, 1]));

        let page = StubRepository::apply_paginate(items.clone(), 2, 2);
        assert_eq!(page, pick(&items, &[2, 3]));

        let page = StubRepository::apply_paginate(items.clone(), 3, 2);
        assert_eq!(page, pick(&items, &[4]));

        let page = StubRepository::apply_paginate(items, 4, 2);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_search_applies_only_pagination_by_default() {
        let entity = stub("test", 50);
        let repo = seeded(&vec![entity.clone(); 16]).await;

        let result = repo.search(SearchParams::default()).await.unwrap();

        assert_eq!(result.items().len(), 15);
        assert!(result.items().iter().all(|item| item == &entity));
        assert_eq!(result.total(), 16);
        assert_eq!(result.current_page(), 1);
        assert_eq!(result.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(result.last_page(), 2);
        assert_eq!(result.sort(), None);
        assert_eq!(result.sort_direction(), None);
        assert_eq!(result.filter(), None);
    }

    #[tokio::test]
    async fn test_search_filter_and_paginate() {
        let items = vec![stub("test", 50), stub("a", 90), stub("TEST", 90), stub("TeSt", 90)];
        let repo = seeded(&items).await;

        let input = SearchInput::default().page(1).per_page(2).filter("TEST");
        let result = repo.search(SearchParams::new(input)).await.unwrap();

        assert_eq!(result.items(), pick(&items, &[0, 2]).as_slice());
        assert_eq!(result.total(), 3);
        assert_eq!(result.current_page(), 1);
        assert_eq!(result.per_page(), 2);
        assert_eq!(result.filter(), Some("TEST"));
        assert_eq!(result.sort_direction(), None);

        let input = SearchInput::default().page(2).per_page(2).filter("TEST");
        let result = repo.search(SearchParams::new(input)).await.unwrap();

        assert_eq!(result.items(), pick(&items, &[3]).as_slice());
        assert_eq!(result.total(), 3);
        assert_eq!(result.current_page(), 2);
    }

    #[tokio::test]
    async fn test_search_sort_and_paginate() {
        let items = vec![stub("b", 50), stub("a", 90), stub("d", 90), stub("e", 90), stub("c", 90)];
        let repo = seeded(&items).await;

        let input = SearchInput::default().page(1).per_page(2).sort("name");
        let result = repo.search(SearchParams::new(input)).await.unwrap();
        assert_eq!(result.items(), pick(&items, &[3, 2]).as_slice());
        assert_eq!(result.total(), 5);
        assert_eq!(result.sort(), Some("name"));
        assert_eq!(result.sort_direction(), Some(SortDirection::Desc));

        let input = SearchInput::default().page(2).per_page(2).sort("name");
        let result = repo.search(SearchParams::new(input)).await.unwrap();
        assert_eq!(result.items(), pick(&items, &[4, 0]).as_slice());

        let input = SearchInput::default()
            .page(1)
            .per_page(2)
            .sort("name")
            .sort_direction("asc");
        let result = repo.search(SearchParams::new(input)).await.unwrap();
        assert_eq!(result.items(), pick(&items, &[1, 0]).as_slice());
        assert_eq!(result.sort_direction(), Some(SortDirection::Asc));

        let input = SearchInput::default()
            .page(3)
            .per_page(2)
            .sort("name")
            .sort_direction("asc");
        let result = repo.search(SearchParams::new(input)).await.unwrap();
        assert_eq!(result.items(), pick(&items, &[3]).as_slice());
        assert_eq!(result.current_page(), 3);
        assert_eq!(result.last_page(), 3);
    }

    #[tokio::test]
    async fn test_search_filter_sort_and_paginate() {
        let items = vec![
            stub("test", 50),
            stub("a", 90),
            stub("TEST", 90),
            stub("e", 90),
            stub("TeSt", 90),
        ];
        let repo = seeded(&items).await;

        let input = SearchInput::default()
            .page(1)
            .per_page(2)
            .filter("TEST")
            .sort("name");
        let result = repo.search(SearchParams::new(input)).await.unwrap();
        assert_eq!(result.items(), pick(&items, &[0, 4]).as_slice());
        assert_eq!(result.total(), 3);

        let input = SearchInput::default()
            .page(2)
            .per_page(2)
            .filter("TEST")
            .sort("name");
        let result = repo.search(SearchParams::new(input)).await.unwrap();
        assert_eq!(result.items(), pick(&items, &[2]).as_slice());
        assert_eq!(result.total(), 3);
    }

    #[tokio::test]
    async fn test_search_out_of_range_page_is_empty() {
        let items = vec![stub("a", 1), stub("b", 2)];
        let repo = seeded(&items).await;

        let input = SearchInput::default().page(10).per_page(5);
        let result = repo.search(SearchParams::new(input)).await.unwrap();

        assert!(result.items().is_empty());
        assert_eq!(result.total(), 2);
        assert_eq!(result.last_page(), 1);
    }

    #[tokio::test]
    async fn test_search_uses_default_sort_when_none_requested() {
        let items = vec![stub("b", 1), stub("c", 2), stub("a", 3)];
        let repo = repository().with_default_sort("name", SortDirection::Asc);
        repo.store().replace_all(items.clone()).await;

        let result = repo.search(SearchParams::default()).await.unwrap();
        assert_eq!(result.items(), pick(&items, &[2, 0, 1]).as_slice());
        assert_eq!(result.sort(), None);

        let input = SearchInput::default().sort("name");
        let result = repo.search(SearchParams::new(input)).await.unwrap();
        assert_eq!(result.items(), pick(&items, &[1, 0, 2]).as_slice());
    }

    #[test]
    fn test_sortable_fields() {
        assert_eq!(repository().sortable_fields(), ["name".to_string()]);
    }

    #[test]
    fn test_sort_key_ordering() {
        assert_eq!(SortKey::from("a").compare(&SortKey::from("b")), Ordering::Less);
        assert_eq!(SortKey::from("test").compare(&SortKey::from("TeSt")), Ordering::Greater);
        assert_eq!(SortKey::from(2).compare(&SortKey::from(10)), Ordering::Less);
        assert_eq!(SortKey::from(f64::NAN).compare(&SortKey::from(1.0)), Ordering::Greater);
        assert_eq!(SortKey::from(1.0).compare(&SortKey::from(-f64::NAN)), Ordering::Less);
        assert_eq!(SortKey::from(f64::NAN).compare(&SortKey::from(f64::NAN)), Ordering::Equal);
        assert_eq!(SortKey::from(-0.5).compare(&SortKey::from(0.25)), Ordering::Less);
        assert_eq!(SortKey::from("z").compare(&SortKey::from(1)), Ordering::Less);
        assert_eq!(compare_keys(None, Some(SortKey::from(1))), Ordering::Less);
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Reading {
        value: f64,
    }

    impl Sortable for Reading {
        fn sort_key(&self, field: &str) -> Option<SortKey> {
            (field == "value").then(|| self.value.into())
        }
    }

    fn readings() -> (InMemorySearchableRepository<Reading>, Vec<Entity<Reading>>) {
        let repo = InMemorySearchableRepository::new(|_: &Entity<Reading>, _: &str| true, ["value"]);
        let items = (0..200)
            .map(|i| {
                let value = if i % 3 == 0 {
                    f64::NAN
                } else {
                    ((i * 37) % 101) as f64 - 50.5
                };
                Entity::new(Reading { value }, None)
            })
            .collect();
        (repo, items)
    }

    #[test]
    fn test_apply_sort_float_with_nan_ascending() {
        let (repo, items) = readings();

        let sorted = repo.apply_sort(items, Some("value"), Some(SortDirection::Asc));
        let values: Vec<f64> = sorted.iter().map(|item| item.props().value).collect();

        let first_nan = values.iter().position(|v| v.is_nan()).unwrap();
        assert!(values[first_nan..].iter().all(|v| v.is_nan()));
        assert!(values[..first_nan].windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(values.len() - first_nan, 67);
    }

    #[test]
    fn test_apply_sort_float_with_nan_descending() {
        let (repo, items) = readings();

        let sorted = repo.apply_sort(items, Some("value"), Some(SortDirection::Desc));
        let values: Vec<f64> = sorted.iter().map(|item| item.props().value).collect();

        let first_number = values.iter().position(|v| !v.is_nan()).unwrap();
        assert_eq!(first_number, 67);
        assert!(values[first_number..].iter().all(|v| !v.is_nan()));
        assert!(values[first_number..].windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
