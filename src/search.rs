use crate::api::{Query, User};

/// Does `user` pass the name and age filters of `query`?
///
/// Name is a case-insensitive substring match. Age must equal the filter text
/// (surrounding whitespace ignored). Empty filters match everything.
pub fn matches(user: &User, query: &Query) -> bool {
    let name = query.name.trim().to_lowercase();
    let age = query.age.trim();
    let name_ok = name.is_empty() || user.name.to_lowercase().contains(&name);
    let age_ok = age.is_empty() || user.age_display() == age;
    name_ok && age_ok
}

/// Filter `users` by `query` and cut out its `offset`/`limit` window.
pub fn filter_page(users: &[User], query: &Query) -> Vec<User> {
    users
        .iter()
        .filter(|u| matches(u, query))
        .skip(query.offset)
        .take(query.limit)
        .cloned()
        .collect()
}

pub fn count_matching(users: &[User], query: &Query) -> u64 {
    let n = users.iter().filter(|u| matches(u, query)).count();
    u64::try_from(n).unwrap_or(u64::MAX)
}
