//! Seed catalog the library component ships with

use crate::models::Song;

/// The ten songs every freshly mounted library starts from
pub fn sample_songs() -> Vec<Song> {
    vec![
        Song::new(1, "Bohemian Rhapsody", "Queen", "A Night at the Opera", "Rock", "5:55", 1975),
        Song::new(2, "Stairway to Heaven", "Led Zeppelin", "Led Zeppelin IV", "Rock", "8:02", 1971),
        Song::new(3, "Hotel California", "Eagles", "Hotel California", "Rock", "6:30", 1976),
        Song::new(4, "Sweet Child O Mine", "Guns N Roses", "Appetite for Destruction", "Rock", "5:03", 1987),
        Song::new(5, "Billie Jean", "Michael Jackson", "Thriller", "Pop", "4:54", 1982),
        Song::new(6, "Like a Rolling Stone", "Bob Dylan", "Highway 61 Revisited", "Folk Rock", "6:13", 1965),
        Song::new(7, "Purple Haze", "Jimi Hendrix", "Are You Experienced", "Rock", "2:50", 1967),
        Song::new(8, "Imagine", "John Lennon", "Imagine", "Rock", "3:03", 1971),
        Song::new(9, "Good Vibrations", "The Beach Boys", "Pet Sounds", "Pop Rock", "3:39", 1966),
        Song::new(10, "Hey Jude", "The Beatles", "Hey Jude", "Rock", "7:11", 1968),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_ids_are_unique_and_sequential() {
        let songs = sample_songs();
        let ids: HashSet<u64> = songs.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(songs.iter().map(|s| s.id).max(), Some(10));
    }
}
