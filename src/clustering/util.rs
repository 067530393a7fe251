use crate::clustering::types::Cluster;

/// Reassigns ids sequentially (`c0`, `c1`, ...) in list order.
///
/// Must run after every structural change before the list is final.
pub fn renumber(clusters: &mut [Cluster]) {
    for (i, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = format!("c{}", i);
    }
}

/// Finds a cluster by id in a finalized list.
pub fn find_cluster<'a>(clusters: &'a [Cluster], id: &str) -> Option<&'a Cluster> {
    clusters.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::entity::EntityExtractor;

    fn clusters(titles: &[&str]) -> Vec<Cluster> {
        let extractor = EntityExtractor::new();
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| Cluster::new(Article::new(&i.to_string(), t), extractor.extract(t)))
            .collect()
    }

    #[test]
    fn test_renumber_is_sequential_and_idempotent() {
        let mut list = clusters(&["first story", "second story", "third story"]);
        renumber(&mut list);
        let once: Vec<String> = list.iter().map(|c| c.id.clone()).collect();
        assert_eq!(once, vec!["c0", "c1", "c2"]);

        renumber(&mut list);
        let twice: Vec<String> = list.iter().map(|c| c.id.clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_find_cluster() {
        let mut list = clusters(&["first story", "second story"]);
        renumber(&mut list);
        assert_eq!(find_cluster(&list, "c1").map(|c| c.first_title()), Some("second story"));
        assert!(find_cluster(&list, "c9").is_none());
    }
}
