use std::collections::BTreeMap;

use foundation::math::geodesy::GeoPoint;
use streaming::protocol::NewsItem;

/// News items sharing one location, shown as a single map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: GeoPoint,
    pub city: String,
    pub titles: Vec<String>,
    pub count: usize,
}

fn coord_key(lat: f64, lng: f64) -> (u64, u64) {
    // +0.0 folds -0.0 into the same bucket.
    ((lat + 0.0).to_bits(), (lng + 0.0).to_bits())
}

/// Groups items by identical coordinates, in order of first appearance.
/// Items with non-finite coordinates are skipped.
pub fn group_markers(news: &[NewsItem]) -> Vec<Marker> {
    let mut index: BTreeMap<(u64, u64), usize> = BTreeMap::new();
    let mut markers: Vec<Marker> = Vec::new();

    for item in news {
        if !item.lat.is_finite() || !item.lng.is_finite() {
            continue;
        }
        let slot = *index.entry(coord_key(item.lat, item.lng)).or_insert_with(|| {
            markers.push(Marker {
                position: GeoPoint {
                    lat_deg: item.lat,
                    lng_deg: item.lng,
                },
                city: item.city.clone(),
                titles: Vec::new(),
                count: 0,
            });
            markers.len() - 1
        });
        let marker = &mut markers[slot];
        marker.titles.push(item.title.clone());
        marker.count += 1;
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::group_markers;
    use streaming::protocol::NewsItem;

    fn item(city: &str, lat: f64, lng: f64, title: &str) -> NewsItem {
        NewsItem {
            city: city.to_string(),
            lat,
            lng,
            title: title.to_string(),
            ..NewsItem::default()
        }
    }

    #[test]
    fn groups_by_exact_coordinates_in_first_seen_order() {
        let news = vec![
            item("Madrid", 40.4, -3.7, "a"),
            item("Lisboa", 38.7, -9.1, "b"),
            item("Madrid", 40.4, -3.7, "c"),
            item("Sin lugar", f64::NAN, 0.0, "d"),
        ];
        let markers = group_markers(&news);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].city, "Madrid");
        assert_eq!(markers[0].count, 2);
        assert_eq!(markers[0].titles, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(markers[1].city, "Lisboa");
    }

    #[test]
    fn signed_zero_shares_a_marker() {
        let news = vec![item("x", 0.0, -0.0, "a"), item("x", -0.0, 0.0, "b")];
        assert_eq!(group_markers(&news).len(), 1);
    }
}
