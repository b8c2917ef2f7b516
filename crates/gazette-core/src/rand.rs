use rand::Rng as _;
use rand::distr::{Distribution, StandardUniform};

use super::{ArticleId, MemberId, ReportId};

macro_rules! impl_random_id {
    ($t:ident) => {
        impl Distribution<$t> for StandardUniform {
            fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> $t {
                $t(rng.random())
            }
        }

        impl $t {
            pub fn random() -> Self {
                rand::rng().random()
            }
        }
    };
}

impl_random_id!(ArticleId);
impl_random_id!(MemberId);
impl_random_id!(ReportId);
