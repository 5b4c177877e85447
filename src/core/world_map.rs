use rand::Rng;
use rand::seq::SliceRandom;

use super::constants::{DIRECTIONS, MAX_MAP_SIZE};
use super::error::GameError;
use super::nation::Nation;
use super::province::Province;

/// 格子坐标 (x, y)，x 为列，y 为行
pub type Coord = (usize, usize);

/// 行优先存储的矩形省份网格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldMap {
    width: usize,
    height: usize,
    provinces: Vec<Province>,
}

impl WorldMap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.provinces.len()
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn province(&self, x: usize, y: usize) -> Option<&Province> {
        self.index(x, y).map(|i| &self.provinces[i])
    }

    pub fn province_mut(&mut self, x: usize, y: usize) -> Option<&mut Province> {
        self.index(x, y).map(move |i| &mut self.provinces[i])
    }

    pub fn province_at(&self, (x, y): Coord) -> Option<&Province> {
        self.province(x, y)
    }

    pub fn province_at_mut(&mut self, (x, y): Coord) -> Option<&mut Province> {
        self.province_mut(x, y)
    }

    /// 替换指定位置的省份，越界时返回 false
    pub fn set_province(&mut self, x: usize, y: usize, province: Province) -> bool {
        match self.province_mut(x, y) {
            Some(slot) => {
                *slot = province;
                true
            }
            None => false,
        }
    }

    /// 行优先遍历所有坐标
    pub fn coordinates(&self) -> impl Iterator<Item = Coord> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// 按 DIRECTIONS 顺序列出界内的四邻域坐标
    pub fn neighbors(&self, (x, y): Coord) -> impl Iterator<Item = Coord> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            self.in_bounds(nx, ny).then_some((nx as usize, ny as usize))
        })
    }
}

/// 地图构建器：create -> seed_nations -> build
pub struct MapBuilder<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    map: Option<WorldMap>,
}

impl<'a, R: Rng + ?Sized> MapBuilder<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng, map: None }
    }

    /// 创建 size x size 的随机省份网格
    pub fn create(self, size: usize) -> Result<Self, GameError> {
        self.create_non_square(size, size)
    }

    pub fn create_non_square(mut self, width: usize, height: usize) -> Result<Self, GameError> {
        if width == 0 || height == 0 || width > MAX_MAP_SIZE || height > MAX_MAP_SIZE {
            return Err(GameError::InvalidDimensions { width, height });
        }
        let provinces = (0..width * height)
            .map(|_| Province::random(&mut *self.rng))
            .collect();
        self.map = Some(WorldMap {
            width,
            height,
            provinces,
        });
        Ok(self)
    }

    /// 将每个国家随机放置在不同的空格子上，随后以总发展度初始化军队
    pub fn seed_nations(mut self, nations: &mut [Nation]) -> Result<Self, GameError> {
        let map = self.map.as_mut().ok_or(GameError::NotCreated)?;
        let mut coords: Vec<Coord> = map.coordinates().collect();
        if nations.len() > coords.len() {
            return Err(GameError::TooManyNations {
                nations: nations.len(),
                tiles: coords.len(),
            });
        }
        coords.shuffle(&mut *self.rng);

        for (nation, &coord) in nations.iter_mut().zip(coords.iter()) {
            if let Some(province) = map.province_at_mut(coord) {
                province.set_owner(Some(nation.id()));
            }
            nation.add_province_on_setup(coord);
        }
        for nation in nations.iter_mut() {
            let development = nation.total_development(map);
            nation.set_army(development);
        }
        Ok(self)
    }

    pub fn build(self) -> Result<WorldMap, GameError> {
        self.map.ok_or(GameError::NotCreated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nation::NationId;
    use crate::core::strategy::Strategy;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn builder_creates_square_map() {
        let mut rng = StdRng::seed_from_u64(42);
        let map = MapBuilder::new(&mut rng).create(4).unwrap().build().unwrap();
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 4);
        assert_eq!(map.tile_count(), 16);
        assert!(map.coordinates().all(|(x, y)| map.province(x, y).is_some()));
    }

    #[test]
    fn builder_seeds_each_nation_once() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut nations = vec![
            Nation::new(NationId(0), "TestA", Strategy::NoOp),
            Nation::new(NationId(1), "TestB", Strategy::NoOp),
        ];
        let map = MapBuilder::new(&mut rng)
            .create(6)
            .and_then(|b| b.seed_nations(&mut nations))
            .and_then(|b| b.build())
            .unwrap();

        for nation in &nations {
            assert_eq!(nation.province_count(), 1);
            let coord = nation.provinces()[0];
            assert!(map.province_at(coord).unwrap().is_owned_by(nation.id()));
            assert_eq!(
                nation.army(),
                nation.total_development(&map).max(1),
                "初始军队等于总发展度"
            );
        }
        assert_ne!(nations[0].provinces()[0], nations[1].provinces()[0]);

        let owned = map
            .coordinates()
            .filter(|&c| map.province_at(c).unwrap().owner().is_some())
            .count();
        assert_eq!(owned, 2);
    }

    #[test]
    fn builder_rejects_invalid_input() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            MapBuilder::new(&mut rng).create(0).err(),
            Some(GameError::InvalidDimensions { width: 0, height: 0 })
        );
        assert_eq!(
            MapBuilder::new(&mut rng)
                .create_non_square(MAX_MAP_SIZE + 1, 1)
                .err(),
            Some(GameError::InvalidDimensions {
                width: MAX_MAP_SIZE + 1,
                height: 1
            })
        );
        assert_eq!(
            MapBuilder::new(&mut rng).build().err(),
            Some(GameError::NotCreated)
        );

        let mut nations: Vec<Nation> = (0..5)
            .map(|i| Nation::new(NationId(i), format!("N{i}"), Strategy::NoOp))
            .collect();
        let result = MapBuilder::new(&mut rng)
            .create(2)
            .and_then(|b| b.seed_nations(&mut nations));
        assert_eq!(
            result.err(),
            Some(GameError::TooManyNations { nations: 5, tiles: 4 })
        );
    }

    #[test]
    fn non_square_map_and_neighbors() {
        let mut rng = StdRng::seed_from_u64(3);
        let map = MapBuilder::new(&mut rng)
            .create_non_square(3, 2)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!((map.width(), map.height()), (3, 2));
        assert!(map.province(2, 1).is_some());
        assert!(map.province(3, 0).is_none());
        assert!(!map.in_bounds(-1, 0));

        let corner: Vec<Coord> = map.neighbors((0, 0)).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        let middle: Vec<Coord> = map.neighbors((1, 0)).collect();
        assert_eq!(middle, vec![(2, 0), (0, 0), (1, 1)]);
    }

    #[test]
    fn coordinates_are_row_major() {
        let mut rng = StdRng::seed_from_u64(3);
        let map = MapBuilder::new(&mut rng)
            .create_non_square(2, 2)
            .unwrap()
            .build()
            .unwrap();
        let coords: Vec<Coord> = map.coordinates().collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
